use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::io::recovery::{self, RecoveryCategory, RecoveryEntry};

/// Slot holding the serialized task list
pub const TASKS_KEY: &str = "tasks";
/// Slot holding the theme preference
pub const THEME_KEY: &str = "theme";

/// File name of the storage document inside the data directory
pub const STORAGE_FILE: &str = "storage.json";

/// Error type for key-value store operations
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode storage: {0}")]
    EncodeError(#[from] serde_json::Error),
}

/// Durable string-keyed storage.
///
/// Values are opaque strings; callers serialize whatever they keep in a slot.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError>;

    /// Directory for the recovery log, when the store lives on disk
    fn recovery_dir(&self) -> Option<&Path> {
        None
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store, used by tests and previews
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: IndexMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for a store with a pre-filled slot
    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// All slots in one JSON object (`storage.json`), read once when opened and
/// rewritten atomically on every `set`.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    path: PathBuf,
    slots: IndexMap<String, String>,
}

impl FileStore {
    /// Open (creating the directory if needed) the store in `dir`.
    ///
    /// A storage file that is not a JSON object of strings is copied to the
    /// recovery log and the store starts empty.
    pub fn open(dir: &Path) -> Result<Self, KvError> {
        fs::create_dir_all(dir).map_err(|e| KvError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = dir.join(STORAGE_FILE);

        let slots = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| KvError::ReadError {
                path: path.clone(),
                source: e,
            })?;
            match serde_json::from_str::<IndexMap<String, String>>(&content) {
                Ok(slots) => slots,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "storage file is corrupt, starting empty");
                    recovery::log_recovery(
                        dir,
                        RecoveryEntry::now(RecoveryCategory::Parser, "unreadable storage file", content)
                            .with_field("Source", STORAGE_FILE)
                            .with_field("Error", e.to_string()),
                    );
                    IndexMap::new()
                }
            }
        } else {
            IndexMap::new()
        };

        debug!(path = %path.display(), slots = slots.len(), "opened storage");
        Ok(FileStore {
            dir: dir.to_path_buf(),
            path,
            slots,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), KvError> {
        let content = serde_json::to_string_pretty(&self.slots)?;
        if let Err(e) = recovery::atomic_write(&self.path, content.as_bytes()) {
            recovery::log_recovery(
                &self.dir,
                RecoveryEntry::now(RecoveryCategory::Write, "storage write failed", content)
                    .with_field("Target", STORAGE_FILE)
                    .with_field("Error", e.to_string()),
            );
            return Err(KvError::WriteError {
                path: self.path.clone(),
                source: e,
            });
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), KvError> {
        self.slots.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn recovery_dir(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}
