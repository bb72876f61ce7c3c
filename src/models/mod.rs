//! Data types exchanged with the backend and kept in the session.

pub mod admin;
pub mod profile;
pub mod token;

pub use profile::{Profile, ProfileId};
pub use token::{AccessToken, AdminGrant, UserGrant};
