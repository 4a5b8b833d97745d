//! File system storage management
//!
//! Maps virtual FTP paths into the save directory and wraps the filesystem
//! operations the command handlers need.

pub mod operations;
pub mod validation;

pub use operations::{list_directory, make_directory, remove_file, rename_entry};
pub use validation::{resolve_directory, resolve_entry, resolve_virtual_path, virtual_to_real};
