use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// LoggingConfig controls how we initialize tracing/logging.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LoggingConfig {
    pub level: String,  // e.g. "info", "debug", "warn"
    pub format: String, // e.g. "json", "console"
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
}

fn default_service_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            // Command output goes to stdout; keep stderr quiet unless asked.
            level: "warn".to_string(),
            format: "console".to_string(),
            service_name: default_service_name(),
            service_version: default_service_version(),
        }
    }
}
