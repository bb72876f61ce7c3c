//! Client side of the REST backend.
//!
//! [`Backend`] is the seam the session manager talks through; [`HttpBackend`]
//! is the reqwest implementation used in production and in tests against a
//! mock server.

pub mod base;
pub mod error;
pub mod http_backend;

pub use base::{Backend, Credentials, Registration, RequestOptions};
pub use error::{ApiError, ErrorKind, NETWORK_ERROR_MESSAGE};
pub use http_backend::HttpBackend;
