//! Object Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// An object error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for object operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Directory does not exist
    #[display("directory not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Expected a directory, found something else
    #[display("not a directory: {}", _0.display())]
    NotADirectory(#[error(not(source))] PathBuf),
    /// Object name contains separators, traversal or NUL bytes
    #[display("invalid object name: {_0:?}")]
    InvalidName(#[error(not(source))] String),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}

impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Local filesystem operations are assumed deterministic.
        false
    }
}
