//! Checksum computation with configurable algorithms.
//!
//! This crate wraps several hashing libraries behind a unified [`Digest`]
//! enum, providing:
//!
//! - **Algorithm selection** from configuration strings ([`FromStr`](std::str::FromStr))
//! - **Single-pass, multi-algorithm** file hashing ([`sums`]) — every
//!   requested digest is updated from the same chunked read, so a file is
//!   only ever read once no matter how many checksums are asked for
//! - **Reader-based** hashing ([`sums_reader`]) for content that is not a
//!   plain file on disk
//!
//! Files are streamed in fixed-size chunks and never buffered whole, so
//! arbitrarily large payloads hash in constant memory. All digests are
//! returned as lowercase hexadecimal.

mod construct;
mod engine;
pub mod error;

pub use crate::engine::{Hasher, sums, sums_reader};

/// A supported checksum algorithm.
///
/// The set deliberately spans both camps an archival workflow needs:
/// fast non-cryptographic digests ([`Crc32`](Self::Crc32)) for cheap
/// corruption checks, legacy digests ([`Md5`](Self::Md5)) that downstream
/// systems still expect, and strong content digests for fixity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Digest {
    /// CRC-32 (IEEE), fast and non-cryptographic
    Crc32,
    /// MD5, kept for interoperability with downstream systems
    Md5,
    /// SHA-2 256-bit
    Sha256,
    /// SHA-2 512-bit
    Sha512,
    /// SHA-3 256-bit
    Sha3_256,
    /// BLAKE3
    Blake3,
}
