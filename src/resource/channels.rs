//! Channel directory - sound id to channel metadata
//!
//! Channel guides are JSON files under a `channelguides/` directory, each an
//! object mapping sound ids to `{ "name", "priority", "tags" }`. All guides
//! merge into one table, later files (in path order) overriding earlier ones.
//!
//! The table is published behind an `Arc` and replaced wholesale on reload,
//! so a lookup always sees either the old or the new table in full.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::captions::types::Channel;

/// Conventional directory holding channel guide files
pub const CHANNEL_GUIDE_DIR: &str = "channelguides";

/// Merged sound id to channel mapping
pub type ChannelTable = HashMap<String, Channel>;

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("cannot read channel guides from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read-only lookup from sound id to channel, reloadable from disk
#[derive(Debug)]
pub struct ChannelDirectory {
    root: Option<PathBuf>,
    table: RwLock<Arc<ChannelTable>>,
}

impl ChannelDirectory {
    /// Directory backed by a fixed in-memory table; `reload` keeps it as is
    pub fn from_table(table: ChannelTable) -> Self {
        Self {
            root: None,
            table: RwLock::new(Arc::new(table)),
        }
    }

    /// Load every guide under `root`
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self, ChannelError> {
        let root = root.as_ref().to_path_buf();
        let table = load_guides(&root)?;
        log::info!(
            "Loaded {} caption channels from {}",
            table.len(),
            root.display()
        );
        Ok(Self {
            root: Some(root),
            table: RwLock::new(Arc::new(table)),
        })
    }

    /// Channel for `sound_id`, or the default channel if none is listed
    pub fn lookup(&self, sound_id: &str) -> Channel {
        self.snapshot()
            .get(sound_id)
            .cloned()
            .unwrap_or_default()
    }

    /// The currently published table
    pub fn snapshot(&self) -> Arc<ChannelTable> {
        Arc::clone(&self.table.read())
    }

    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Rebuild the table from disk and publish it.
    ///
    /// On error the previous table stays in place.
    pub fn reload(&self) -> Result<usize, ChannelError> {
        let Some(root) = &self.root else {
            return Ok(self.len());
        };
        let table = load_guides(root)?;
        let count = table.len();
        self.replace(table);
        log::info!("Reloaded {} caption channels from {}", count, root.display());
        Ok(count)
    }

    /// Publish a fully built table
    pub fn replace(&self, table: ChannelTable) {
        *self.table.write() = Arc::new(table);
    }
}

/// Build a merged table from every `*.json` file below `root`.
///
/// Files that fail to parse are logged and skipped. A missing `root`
/// yields an empty table.
pub fn load_guides(root: &Path) -> Result<ChannelTable, ChannelError> {
    let mut files = Vec::new();
    if root.exists() {
        collect_guide_files(root, &mut files)?;
    } else {
        log::warn!("Channel guide directory {} does not exist", root.display());
    }
    files.sort();

    let mut table = ChannelTable::new();
    for path in files {
        let content = fs::read_to_string(&path).map_err(|source| ChannelError::Io {
            path: path.clone(),
            source,
        })?;
        match serde_json::from_str::<HashMap<String, Channel>>(&content) {
            Ok(guide) => table.extend(guide),
            Err(e) => log::warn!("Skipping malformed channel guide {}: {}", path.display(), e),
        }
    }
    Ok(table)
}

fn collect_guide_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ChannelError> {
    let io_err = |source| ChannelError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_guide_files(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(path);
        }
    }
    Ok(())
}
