//! Checksum Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A checksum error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for checksum operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file could not be opened for hashing. Never silently skipped;
    /// the caller decides whether to abort the object or the batch.
    #[display("unreadable file: {}", _0.display())]
    Unreadable(#[error(not(source))] PathBuf),
    /// An I/O operation failed mid-read.
    #[display("I/O error")]
    Io,
    /// The requested algorithm name is not recognised.
    #[display("unknown digest algorithm: {_0}")]
    UnknownAlgorithm(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Local filesystem reads are assumed deterministic.
        false
    }
}
