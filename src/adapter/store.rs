//! File-backed preference store.
//!
//! A flat JSON object of string keys and string values, read once at open
//! and written through on every `set`. This is the local analogue of the
//! browser preference storage the dashboard uses.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use crate::error::{Error, Result};
use crate::port::PreferenceStore;

pub struct FilePreferenceStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// Open a store at `path`, loading existing entries. A missing file is
    /// an empty store; a malformed file is treated as empty rather than
    /// poisoning every preference read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Malformed preference file, starting empty");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// The file this store persists to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("create {}: {e}", parent.display())))?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)
            .map_err(|e| Error::Store(format!("write {}: {e}", self.path.display())))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str, default: &str) -> String {
        self.entries
            .lock()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }
}
