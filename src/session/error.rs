use thiserror::Error;

use crate::api::{ApiError, ErrorKind};

/// Failure of a session operation. Backend errors pass through unchanged so
/// their message is exactly what the backend said.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("You are not signed in")]
    NotAuthenticated,

    #[error("A user session is required")]
    UserRequired,

    #[error("An administrator session is required")]
    AdminRequired,

    #[error("The session is still initializing")]
    Initializing,
}

impl SessionError {
    /// Classification of the underlying backend error, if there is one.
    pub fn api_kind(&self) -> Option<ErrorKind> {
        match self {
            SessionError::Api(e) => Some(e.kind()),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        self.api_kind() == Some(ErrorKind::Network)
    }
}
