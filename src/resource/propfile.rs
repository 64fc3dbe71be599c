// Property File Parser
// Parses simple key=value property files used for settings and captions

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Parse property file content, invoking `handler` for each key-value pair.
///
/// Keys and values are trimmed. Blank lines and lines whose first
/// non-blank character is `#` are skipped. Values may themselves contain
/// `#` and `=`; only the first `=` separates key from value. Lines without
/// `=` are reported and skipped.
pub fn parse_propfile(data: &str, handler: &mut dyn FnMut(&str, &str)) {
    for (lineno, raw) in data.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            log::warn!("Key without value on line {}", lineno + 1);
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            log::warn!("Value without key on line {}", lineno + 1);
            continue;
        }

        handler(key, value.trim());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("Property file not found")]
    FileNotFound,
    #[error("I/O error reading property file: {0}")]
    Io(#[from] io::Error),
}

/// Ordered collection of key-value pairs.
///
/// Keys are case-sensitive; localization keys such as `captions:walk/grass`
/// are matched exactly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyFile {
    properties: BTreeMap<String, String>,
}

impl PropertyFile {
    /// Load a property file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PropertyError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PropertyError::FileNotFound,
            _ => PropertyError::Io(e),
        })?;
        Ok(Self::parse(&content))
    }

    /// Parse property file content; later duplicates override earlier ones
    pub fn parse(content: &str) -> Self {
        let mut properties = BTreeMap::new();
        parse_propfile(content, &mut |k, v| {
            properties.insert(k.to_string(), v.to_string());
        });
        PropertyFile { properties }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Parse a value with `FromStr`, `None` if absent or unparsable
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        self.get(key)?.parse().ok()
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.properties.insert(key.to_string(), value.to_string());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.properties.iter()
    }

    /// Merge another file into this one; entries in `other` win
    pub fn merge(&mut self, other: &PropertyFile) {
        for (key, value) in other.iter() {
            self.properties.insert(key.clone(), value.clone());
        }
    }

    /// Serialize back to key=value text, sorted by key
    pub fn to_string_sorted(&self) -> String {
        let mut content = String::new();
        for (key, value) in &self.properties {
            content.push_str(key);
            content.push_str(" = ");
            content.push_str(value);
            content.push('\n');
        }
        content
    }

    /// Save the property file to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PropertyError> {
        fs::write(path, self.to_string_sorted())?;
        Ok(())
    }
}
