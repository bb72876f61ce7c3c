use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A wrapper for the session storage configuration:
/// - enabled: if false, nothing is persisted between runs (NoStore).
/// - backend: where persisted sessions live.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct StorageConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub backend: StorageBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            enabled: true,
            backend: StorageBackend::File(FileStorageConfig::default()),
        }
    }
}

/// The available storage backends, selected via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum StorageBackend {
    #[serde(rename = "file")]
    File(FileStorageConfig),
    #[serde(rename = "memory")]
    Memory,
}

#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct FileStorageConfig {
    pub path: PathBuf,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        FileStorageConfig {
            path: PathBuf::from(".mindbridge/session.json"),
        }
    }
}
