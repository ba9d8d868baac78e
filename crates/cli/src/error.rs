//! Front-end Error Types

use derive_more::{Display, Error};

/// A front-end error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Configuration profile could not be loaded or merged.
    #[display("configuration error")]
    Config,
    /// Stage name not recognised.
    #[display("unknown stage: {_0}")]
    UnknownStage(#[error(not(source))] String),
    /// Digest algorithm name not recognised.
    #[display("unknown digest algorithm: {_0}")]
    UnknownDigest(#[error(not(source))] String),
    /// The pipeline reported an unrecoverable failure.
    #[display("pipeline failed")]
    Pipeline,
}
