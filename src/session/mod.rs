//! Client-side session state: who is signed in, kept consistent with the
//! backend and with durable storage.

mod account;
mod admin;
pub mod error;
pub mod manager;
pub mod state;
pub mod storage;

pub use error::SessionError;
pub use manager::SessionManager;
pub use state::{Phase, Role, SessionState};
pub use storage::{SessionStorage, StorageError, ADMIN_KEY, TOKEN_KEY, USER_KEY};
