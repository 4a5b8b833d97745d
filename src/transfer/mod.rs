//! Transfer module
//!
//! Data channel negotiation (PASV/PORT) and the file I/O that runs over the
//! negotiated connection.

pub mod channel;
pub mod file_ops;

pub use channel::{DataChannel, open_data_stream, parse_port_argument, setup_passive};
pub use file_ops::{receive_file, send_file};
