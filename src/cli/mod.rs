//! The `mindbridge` command-line front end.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionError;
use crate::utils::logger::LoggingError;

pub mod commands;
mod handlers;
pub mod output;

pub use commands::{AdminCommand, Cli, Command};
pub use handlers::run;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] figment::Error),

    #[error("configuration file not found: {}", .0.display())]
    MissingConfig(PathBuf),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("{0}")]
    Usage(String),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for network failures, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Session(e) if e.is_network() => 2,
            _ => 1,
        }
    }
}
