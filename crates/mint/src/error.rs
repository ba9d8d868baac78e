//! Minting Error Types

use derive_more::{Display, Error};

/// A minting error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for minting operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The configured naming authority could not produce an identifier.
    /// Local random generation never raises this; a remote authority will.
    #[display("naming authority unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
