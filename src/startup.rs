//! Session start-up.
//!
//! Builds the backend client and the storage selected by the configuration,
//! then runs the session manager's one-time initialization.

use std::sync::Arc;

use tracing::info;

use crate::api::{ApiError, HttpBackend};
use crate::config::ConfigV1;
use crate::session::SessionManager;
use crate::store::create_store;

/// Assemble a session manager from configuration without initializing it.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_session(config: &ConfigV1) -> Result<SessionManager, ApiError> {
    let backend = Arc::new(HttpBackend::new(&config.api)?);
    let store = create_store(&config.storage);
    if !store.is_enabled() {
        info!("Sessions will not be remembered between runs");
    }
    Ok(SessionManager::new(backend, store))
}

/// Assemble a session manager and run startup verification.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed. Verification
/// failures are not errors: they leave the session anonymous.
pub async fn start(config: &ConfigV1) -> Result<SessionManager, ApiError> {
    let mut session = build_session(config)?;
    session.init().await;
    Ok(session)
}
