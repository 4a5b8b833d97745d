//! Server core functionality
//!
//! The accept loop, connection limits, and startup bootstrap for the
//! upload gateway.

pub mod core;
pub mod registry;

pub use core::Server;
pub use registry::ConnectionRegistry;
