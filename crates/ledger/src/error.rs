//! Ledger Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A ledger error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The metadata source must be a CSV file.
    #[display("not a CSV file: {}", _0.display())]
    NotCsv(#[error(not(source))] PathBuf),
    /// The header row does not equal the required field list. The whole
    /// stage aborts with zero files written — there is no partial
    /// processing of a malformed ledger.
    #[display("header does not match the required field list (found: {_0})")]
    HeaderMismatch(#[error(not(source))] String),
    /// The requested identifier column is not part of the header.
    #[display("no such column: {_0}")]
    MissingColumn(#[error(not(source))] String),
    /// A file that should contain exactly one data row contains none.
    #[display("empty record: {}", _0.display())]
    EmptyRecord(#[error(not(source))] PathBuf),
    /// CSV-level parse or write failure
    #[display("CSV error: {_0}")]
    Csv(csv::Error),
    /// Template rendering failed. Reported, but never invalidates the
    /// record it was rendered from.
    #[display("rendering failed")]
    Render,
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}

impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ErrorKind {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Local filesystem operations are assumed deterministic.
        false
    }
}
