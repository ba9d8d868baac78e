//! Single-file archiving of object directories.

use crate::error::{ErrorKind, Result};
use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Archive compression. Plain tar by default; gzip is an explicit opt-in
/// (the `tar.gz` form follows the Spatial Data Transfer Standard's usage).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    /// Uncompressed `.tar`
    #[default]
    None,
    /// Gzip-compressed `.tar.gz`
    Gzip,
}

impl Compression {
    /// Returns the file extension for this archive format.
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Compression::None => "tar",
            Compression::Gzip => "tar.gz",
        }
    }
}

/// The outcome of (successfully) archiving a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new archive was written at the given path.
    Created(PathBuf),
    /// An archive already existed at the given path; it was left untouched.
    AlreadyExists(PathBuf),
}

/// Serialises directories into single archive files, never overwriting.
#[derive(Debug, Clone, Copy, Default)]
pub struct Archiver {
    compression: Compression,
}

impl Archiver {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    /// Archive `source` into `<dest_dir>/<source-base-name>.<ext>`.
    ///
    /// Entries inside the archive are rooted at the source's base name, so
    /// unpacking recreates the directory rather than spraying its contents.
    /// An existing destination file is reported as
    /// [`Outcome::AlreadyExists`] and its bytes are never touched — the
    /// create is `create_new`, so even a race cannot clobber it.
    #[instrument(skip_all, fields(source = %source.as_ref().display()))]
    pub fn archive(&self, source: impl AsRef<Path>, dest_dir: impl AsRef<Path>) -> Result<Outcome> {
        let source = source.as_ref();
        if !source.is_dir() {
            exn::bail!(ErrorKind::NotADirectory(source.to_path_buf()));
        }
        let base = source.file_name().unwrap_or_default().to_string_lossy();
        let destination = dest_dir.as_ref().join(format!("{}.{}", base, self.compression.extension()));
        if destination.exists() {
            return Ok(Outcome::AlreadyExists(destination));
        }
        let file = match OpenOptions::new().write(true).create_new(true).open(&destination) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                return Ok(Outcome::AlreadyExists(destination));
            },
            Err(err) => exn::bail!(ErrorKind::Io(err)),
        };
        match self.compression {
            Compression::None => {
                let mut builder = tar::Builder::new(file);
                builder.append_dir_all(base.as_ref(), source).map_err(ErrorKind::Io)?;
                builder.finish().map_err(ErrorKind::Io)?;
            },
            Compression::Gzip => {
                let encoder = GzEncoder::new(file, GzLevel::default());
                let mut builder = tar::Builder::new(encoder);
                builder.append_dir_all(base.as_ref(), source).map_err(ErrorKind::Io)?;
                builder.into_inner().map_err(ErrorKind::Io)?.finish().map_err(ErrorKind::Io)?;
            },
        }
        tracing::info!(destination = %destination.display(), "archive created");
        Ok(Outcome::Created(destination))
    }
}
