//! Library exports for mindbridge, shared between the binary and tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod session;
pub mod startup;
pub mod store;
pub mod utils;
