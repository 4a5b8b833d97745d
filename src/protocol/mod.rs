//! FTP Protocol implementation
//!
//! Handles FTP command parsing, dispatch, and response generation for the
//! control channel.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::handle_command;
