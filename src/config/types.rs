use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::storage::StorageConfig;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// Prefix for environment overrides, e.g. `MINDBRIDGE_API__BASE_URL`.
pub const ENV_PREFIX: &str = "MINDBRIDGE_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: backend location, session storage and logging.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the REST backend lives.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Layer built-in defaults, the YAML file at `path` (if it exists) and
/// `MINDBRIDGE_*` environment variables, in that order.
pub fn figment_for(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extract a versioned configuration from an already-assembled figment.
pub fn extract_config(figment: &Figment) -> Result<ConfigV1, figment::Error> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
    // handle configuration migration between versions here when necessary
}

/// Load the configuration from `path`, falling back to [`DEFAULT_CONFIG_PATH`].
pub fn load_config(path: Option<&Path>) -> Result<ConfigV1, figment::Error> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    extract_config(&figment_for(path))
}

/// The JSON schema for the configuration, pretty-printed.
pub fn config_schema() -> Result<String, serde_json::Error> {
    let schema = schema_for!(Config);
    serde_json::to_string_pretty(&schema)
}
