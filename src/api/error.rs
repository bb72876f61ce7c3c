use thiserror::Error;

/// Message shown for any failure to reach the backend at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Unable to connect to server. Please check if the backend is running.";

/// Coarse classification of [`ApiError`] so callers can branch without
/// inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend answered and refused (bad credentials, validation, 4xx/5xx).
    Credential,
    /// The backend could not be reached.
    Network,
    /// The backend answered with a body we could not understand.
    Decode,
    /// The request could not be built in the first place.
    InvalidRequest,
}

/// Errors returned by every call to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend reachable but returned a non-success status. `message` is the
    /// backend's `detail` verbatim when it sent one.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("{msg} ({0})", msg = NETWORK_ERROR_MESSAGE)]
    Network(String),

    #[error("Malformed response from server: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Rejected { .. } => ErrorKind::Credential,
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind() == ErrorKind::Network
    }

    /// HTTP status of a rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a reqwest failure raised while sending a request.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_builder() {
            ApiError::InvalidRequest(error.to_string())
        } else if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}
