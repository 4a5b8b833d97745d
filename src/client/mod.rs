//! Client session management
//!
//! Per-connection state and the control-channel loop that drives it.

pub mod handler;
pub mod state;

pub use handler::{SessionContext, handle_session};
pub use state::Session;
