//! Error handling
//!
//! Defines error types and handling for the upload gateway.

pub mod types;

pub use types::*;
