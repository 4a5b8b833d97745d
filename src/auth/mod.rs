//! Authentication system
//!
//! Holds the single authorized account and validates login attempts
//! against it.

pub mod account;
pub mod validator;

pub use account::{Account, Permissions};
pub use validator::authenticate;
