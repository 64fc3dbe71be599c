// String Bank
// Localized caption names keyed by `captions:<sound id>`

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::propfile::{PropertyError, PropertyFile};

/// File extension of language tables inside a language directory
pub const LANG_FILE_EXTENSION: &str = "lang";

/// Localization lookup used by the classifier.
///
/// `None` means "no translation"; `Some("")` is a deliberate request to
/// suppress the sound.
pub trait Localizer {
    fn resolve(&self, key: &str) -> Option<String>;
}

impl Localizer for HashMap<String, String> {
    fn resolve(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// String bank holding one table per language
#[derive(Debug, Clone)]
pub struct StringBank {
    tables: HashMap<String, Arc<PropertyFile>>,
    language: String,
}

impl StringBank {
    pub fn new() -> Self {
        StringBank {
            tables: HashMap::new(),
            language: "en".to_string(),
        }
    }

    /// Create a string bank that prefers `language`
    pub fn with_language(language: &str) -> Self {
        let mut bank = Self::new();
        bank.set_language(language);
        bank
    }

    /// Load a language table from a property file
    pub fn load_table<P: AsRef<Path>>(
        &mut self,
        language: &str,
        path: P,
    ) -> Result<(), PropertyError> {
        let table = PropertyFile::load(path)?;
        self.insert_table(language, table);
        Ok(())
    }

    /// Load a language table from a string
    pub fn load_table_from_string(&mut self, language: &str, content: &str) {
        self.insert_table(language, PropertyFile::parse(content));
    }

    /// Load every `<language>.lang` file in `dir`.
    ///
    /// Returns the number of tables loaded. Unreadable files are logged and
    /// skipped.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize, PropertyError> {
        let mut loaded = 0;
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(LANG_FILE_EXTENSION) {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let language = language.to_string();
            match self.load_table(&language, &path) {
                Ok(()) => loaded += 1,
                Err(e) => log::warn!("Skipping language file {}: {}", path.display(), e),
            }
        }
        Ok(loaded)
    }

    fn insert_table(&mut self, language: &str, table: PropertyFile) {
        // Merge over any table already loaded for the same language
        let lang = language.to_lowercase();
        let merged = match self.tables.get(&lang) {
            Some(existing) => {
                let mut merged = (**existing).clone();
                merged.merge(&table);
                merged
            }
            None => table,
        };
        self.tables.insert(lang, Arc::new(merged));
    }

    pub fn set_language(&mut self, language: &str) {
        self.language = language.to_lowercase();
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Look a key up in the preferred language, then English
    pub fn get(&self, key: &str) -> Option<String> {
        if let Some(value) = self.tables.get(&self.language).and_then(|t| t.get(key)) {
            return Some(value.to_string());
        }

        if self.language != "en" {
            if let Some(value) = self.tables.get("en").and_then(|t| t.get(key)) {
                return Some(value.to_string());
            }
        }

        None
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.tables.contains_key(&language.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

impl Default for StringBank {
    fn default() -> Self {
        Self::new()
    }
}

impl Localizer for StringBank {
    fn resolve(&self, key: &str) -> Option<String> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_fallback() {
        let mut bank = StringBank::with_language("DE");
        bank.load_table_from_string("en", "captions:door = Door\ncaptions:bell = Bell");
        bank.load_table_from_string("de", "captions:door = Tür");

        assert_eq!(bank.language(), "de");
        assert_eq!(bank.get("captions:door"), Some("Tür".to_string()));
        assert_eq!(bank.get("captions:bell"), Some("Bell".to_string()));
        assert_eq!(bank.get("captions:missing"), None);
    }

    #[test]
    fn test_empty_translation_is_distinct_from_missing() {
        let mut bank = StringBank::new();
        bank.load_table_from_string("en", "captions:tick =");
        assert_eq!(bank.resolve("captions:tick"), Some(String::new()));
        assert_eq!(bank.resolve("captions:tock"), None);
    }

    #[test]
    fn test_tables_for_same_language_merge() {
        let mut bank = StringBank::new();
        bank.load_table_from_string("en", "a = 1\nb = 2");
        bank.load_table_from_string("EN", "b = 3");
        assert_eq!(bank.get("a"), Some("1".to_string()));
        assert_eq!(bank.get("b"), Some("3".to_string()));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.lang"), "captions:rain = Rain\n").unwrap();
        std::fs::write(dir.path().join("fr.lang"), "captions:rain = Pluie\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut bank = StringBank::with_language("fr");
        assert_eq!(bank.load_dir(dir.path()).unwrap(), 2);
        assert!(bank.has_language("en"));
        assert_eq!(bank.get("captions:rain"), Some("Pluie".to_string()));
    }

    #[test]
    fn test_hashmap_localizer() {
        let mut map = HashMap::new();
        map.insert("captions:x".to_string(), "X".to_string());
        assert_eq!(map.resolve("captions:x"), Some("X".to_string()));
        assert_eq!(map.resolve("captions:y"), None);
    }
}
