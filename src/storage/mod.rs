//! Persistent client state
//!
//! Layout of the data directory:
//!
//! <data_dir>/
//! ├── local_storage.json     # Key/value preferences (string values)
//! └── session.json           # Identity session (see auth::oauth)

pub mod prefs;

pub use prefs::{DisplayMode, DisplayPreferences};

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name of the key/value store inside the data directory
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// Durable string key/value store
///
/// Mirrors browser local storage: values are strings, every write is flushed
/// to disk immediately.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/local_storage.json`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(LOCAL_STORAGE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking every later write
        let mut items = self.load().unwrap_or_default();
        items.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&items)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }
}
