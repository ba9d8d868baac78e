//! Packaging Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A packaging error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Expected a directory, found something else
    #[display("not a directory: {}", _0.display())]
    NotADirectory(#[error(not(source))] PathBuf),
    /// A payload or tag file could not be hashed
    #[display("checksum failure")]
    Checksum,
    /// The package is missing a required manifest or declaration file
    #[display("missing package file: {}", _0.display())]
    MissingPackageFile(#[error(not(source))] PathBuf),
    /// A manifest line could not be parsed
    #[display("malformed manifest line in {}", _0.display())]
    MalformedManifest(#[error(not(source))] PathBuf),
    /// Traversal failure while enumerating the payload
    #[display("walk failure")]
    Walk,
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
