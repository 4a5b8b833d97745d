//! Error types
//!
//! Defines domain-specific error types for each module of the gateway.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Authentication errors. Never carries the attempted secret.
#[derive(Debug)]
pub enum AuthError {
    LoginFailed(String),
    MalformedInput(String),
    NotLoggedIn,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::LoginFailed(u) => write!(f, "Login failed for user: {}", u),
            AuthError::MalformedInput(s) => write!(f, "Malformed input: {}", s),
            AuthError::NotLoggedIn => write!(f, "User not logged in"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Storage module errors
#[derive(Debug)]
pub enum StorageError {
    FileNotFound(String),
    DirectoryNotFound(String),
    NotADirectory(String),
    InvalidPath(String),
    PathTraversal(String),
    IoError(io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::FileNotFound(p) => write!(f, "File not found: {}", p),
            StorageError::DirectoryNotFound(p) => write!(f, "Directory not found: {}", p),
            StorageError::NotADirectory(p) => write!(f, "Not a directory: {}", p),
            StorageError::InvalidPath(p) => write!(f, "Invalid path: {}", p),
            StorageError::PathTraversal(p) => write!(f, "Path traversal attempt: {}", p),
            StorageError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(error: io::Error) -> Self {
        StorageError::IoError(error)
    }
}

/// Transfer module errors
#[derive(Debug)]
pub enum TransferError {
    NoDataChannel,
    PortBindingFailed(io::Error),
    AcceptTimeout,
    InvalidPortCommand(String),
    IpMismatch { expected: String, provided: String },
    InvalidPortRange(u16),
    UnsupportedAddressFamily,
    TransferFailed(io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::NoDataChannel => write!(f, "Data channel not initialized"),
            TransferError::PortBindingFailed(e) => {
                write!(f, "Failed to bind data listener: {}", e)
            }
            TransferError::AcceptTimeout => {
                write!(f, "Timeout waiting for data connection")
            }
            TransferError::InvalidPortCommand(msg) => write!(f, "Invalid PORT command: {}", msg),
            TransferError::IpMismatch { expected, provided } => {
                write!(f, "IP mismatch: expected {}, got {}", expected, provided)
            }
            TransferError::InvalidPortRange(port) => {
                write!(f, "Invalid port {}: must be 1024 or above", port)
            }
            TransferError::UnsupportedAddressFamily => {
                write!(f, "Data connections require an IPv4 control connection")
            }
            TransferError::TransferFailed(e) => write!(f, "Transfer failed: {}", e),
        }
    }
}

impl std::error::Error for TransferError {}

impl From<io::Error> for TransferError {
    fn from(error: io::Error) -> Self {
        TransferError::TransferFailed(error)
    }
}

/// Fatal startup errors for the gateway as a whole.
#[derive(Debug)]
pub enum GatewayError {
    Config(config::ConfigError),
    Filesystem { path: PathBuf, source: io::Error },
    Bind { addr: String, source: io::Error },
    IoError(io::Error),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Config(e) => write!(f, "Configuration error: {}", e),
            GatewayError::Filesystem { path, source } => {
                write!(f, "Filesystem error at {}: {}", path.display(), source)
            }
            GatewayError::Bind { addr, source } => {
                write!(f, "Failed to bind to {}: {}", addr, source)
            }
            GatewayError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for GatewayError {}

impl From<config::ConfigError> for GatewayError {
    fn from(error: config::ConfigError) -> Self {
        GatewayError::Config(error)
    }
}

impl From<io::Error> for GatewayError {
    fn from(error: io::Error) -> Self {
        GatewayError::IoError(error)
    }
}
