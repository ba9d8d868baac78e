//! Batch-level transfer ledgers.
//!
//! The last artifact a batch produces: one `filename, strong-digest` row
//! per file under the transfer directory, written one level above it so
//! the ledger never ends up inside the content it describes. Downstream
//! ingest verifies received packages against this list.

use crate::error::{ErrorKind, Result};
use crate::stamp;
use exn::OptionExt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Writes a timestamped `Transfer_<dirname>_<MMDD_hhmmss>.csv`.
///
/// No header row; purely additive — nothing under the enumerated
/// directory is mutated by this writer.
pub struct TransferLedger {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: u64,
}

impl TransferLedger {
    /// Create the ledger file for `target`, one level above it.
    pub fn create(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref();
        let parent = target
            .parent()
            .ok_or_raise(|| ErrorKind::Io(io::Error::other("transfer directory has no parent")))?;
        let dirname = target
            .file_name()
            .ok_or_raise(|| ErrorKind::Io(io::Error::other("transfer directory has no name")))?
            .to_string_lossy();
        let path = parent.join(format!("Transfer_{}_{}.csv", dirname, stamp::file(stamp::now())));
        let writer = csv::Writer::from_path(&path).map_err(ErrorKind::Csv)?;
        Ok(Self { writer, path, rows: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `filename, strong-digest` row.
    pub fn push(&mut self, filename: &str, strong_sum: &str) -> Result<()> {
        self.writer.write_record([filename, strong_sum]).map_err(ErrorKind::Csv)?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and return the ledger's path and row count.
    pub fn finish(mut self) -> Result<(PathBuf, u64)> {
        self.writer.flush().map_err(ErrorKind::Io)?;
        tracing::info!(path = %self.path.display(), rows = self.rows, "transfer ledger written");
        Ok((self.path, self.rows))
    }
}
