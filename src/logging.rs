//! Logging setup
//!
//! Every record goes to stderr and to an append-only ftp_server.log in the
//! configured log directory. env_logger formats each record into a single
//! buffered write, so lines from concurrent connection tasks never interleave
//! mid-line. RUST_LOG overrides the default `info` filter.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::error::GatewayError;

pub const LOG_FILE_NAME: &str = "ftp_server.log";

/// Writes each record to stderr and the log file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Initializes the process-wide log sink.
///
/// Creates the log directory if absent and opens the log file for append.
/// Either failing is fatal at startup.
pub fn init(log_dir: &Path) -> Result<(), GatewayError> {
    fs::create_dir_all(log_dir).map_err(|source| GatewayError::Filesystem {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|source| GatewayError::Filesystem {
            path: log_path,
            source,
        })?;

    // try_init: a second call only happens from tests sharing the process
    let _ = Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init();

    Ok(())
}
