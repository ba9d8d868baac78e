//! Transfer-ledger stage: one `filename, strong-digest` row per file under
//! the transfer directory.

use crate::error::{ErrorKind, Result};
use crate::report::TransferReport;
use arca_digest::{Digest, sums};
use arca_ledger::TransferLedger;
use arca_object::walk;
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

/// Write the timestamped transfer ledger for `transfer_dir`, one level
/// above it.
///
/// Purely additive with one exception carried over from every other
/// traversal in the pipeline: OS artifact files encountered on the way are
/// deleted, not listed.
#[instrument(skip_all, fields(transfer_dir = %transfer_dir.display()))]
pub fn run(transfer_dir: &Path, strong: Digest) -> Result<TransferReport> {
    if !transfer_dir.is_dir() {
        exn::bail!(ErrorKind::MissingDirectory(transfer_dir.to_path_buf()));
    }
    let files = walk(transfer_dir, transfer_dir).or_raise(|| ErrorKind::Objects)?;
    let mut ledger = TransferLedger::create(transfer_dir).or_raise(|| ErrorKind::Artifact)?;
    for file in &files {
        let sum = sums(&file.path, &[strong]).or_raise(|| ErrorKind::Checksum)?.remove(0);
        ledger.push(&file.name, &sum).or_raise(|| ErrorKind::Artifact)?;
    }
    let (path, rows) = ledger.finish().or_raise(|| ErrorKind::Artifact)?;
    Ok(TransferReport { files: rows, ledger: Some(path) })
}
