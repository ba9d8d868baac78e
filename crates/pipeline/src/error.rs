//! Pipeline Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Anything that surfaces here ends the current stage; per-object failures
/// are counted and logged inside the stages instead (the batch does not
/// crash because one object is broken).
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The batch root (or another required directory) is missing.
    #[display("directory not found: {}", _0.display())]
    MissingDirectory(#[error(not(source))] PathBuf),
    /// The metadata stage needs a master ledger and none was given.
    #[display("no master ledger configured")]
    NoLedger,
    /// Master ledger problem — header mismatch, malformed rows. Fatal to
    /// the whole pipeline: nothing gets half-processed from a bad ledger.
    #[display("ledger rejected")]
    Ledger,
    /// Object enumeration or traversal failure.
    #[display("object enumeration failed")]
    Objects,
    /// Identifier minting failure.
    #[display("identifier minting failed")]
    Minting,
    /// Checksum computation failure.
    #[display("checksum failure")]
    Checksum,
    /// A tabular artifact (manifest, transfer ledger) could not be written.
    #[display("artifact write failed")]
    Artifact,
    /// The packaging or archiving collaborator failed.
    #[display("packaging collaborator failed")]
    Packaging,
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
