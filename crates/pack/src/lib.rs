//! External collaborators of the packaging pipeline: conforming an object
//! to the payload/tag-manifest packaging convention, and serialising a
//! directory into a single archive file.
//!
//! Both live behind narrow seams ([`Packager`], [`Archiver`]) because the
//! pipeline's contract with them is small: which checksum algorithms to
//! use, which inputs to consume, and a validity predicate on the result.

mod archive;
mod bag;
pub mod error;

pub use crate::archive::{Archiver, Compression, Outcome};
pub use crate::bag::{BagPackager, Package, Packager};
