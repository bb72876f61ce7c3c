use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::{file_store::FileStore, memory_store::MemoryStore, no_store::NoStore};
use crate::config::{StorageBackend, StorageConfig};

/// Failures of the durable key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a valid JSON object: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// The Store trait abstracts durable string storage (read, write, delete by key).
///
/// Reads and writes are synchronous. The session manager is the only writer.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn is_enabled(&self) -> bool {
        // Real stores persist; NoStore reports false so callers can log accordingly
        true
    }
}

/// Creates a concrete store implementation based on the StorageConfig.
/// If `storage.enabled = false`, returns NoStore. Otherwise, picks the specified backend.
pub fn create_store(config: &StorageConfig) -> Arc<dyn Store> {
    if !config.enabled {
        info!("Session storage is disabled. Using NoStore.");
        return Arc::new(NoStore::new());
    }

    match &config.backend {
        StorageBackend::File(file_config) => {
            debug!("Using file session storage at {}", file_config.path.display());
            Arc::new(FileStore::new(&file_config.path))
        }
        StorageBackend::Memory => {
            debug!("Using in-memory session storage.");
            Arc::new(MemoryStore::new())
        }
    }
}
