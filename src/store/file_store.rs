use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use super::{Store, StoreError};

/// A store backed by a single JSON object on disk.
///
/// Every write goes straight to disk (write to a fresh sibling temp file, then rename),
/// so a crash never leaves a half-written file behind. A missing file reads as empty.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        FileStore {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.display_path(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
            path: self.display_path(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.display_path(),
            source,
        };

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(io_err)?;
                parent
            }
            None => Path::new("."),
        };

        let serialized = serde_json::to_string_pretty(entries).map_err(|source| {
            StoreError::Corrupt {
                path: self.display_path(),
                source,
            }
        })?;

        // A uniquely named sibling, so concurrent runs never share a temp file.
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(serialized.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        debug!("Wrote {} session entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn update<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_all()?;
        if change(&mut entries) {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        // Skip the write when there is nothing to delete, so logout on a
        // fresh machine does not create an empty file.
        self.update(|entries| entries.remove(key).is_some())
    }
}
