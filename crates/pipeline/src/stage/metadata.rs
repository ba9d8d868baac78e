//! Metadata stage: write one record (and its rendering) per ledger row.

use crate::confirm::{Confirm, Decisions, Prompt};
use crate::error::{ErrorKind, Result};
use crate::report::MetadataReport;
use arca_ledger::{MasterLedger, REQUIRED_HEADER, Renderer};
use arca_object::Object;
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

/// Resolve each ledger row to an object directory and write its
/// `metadata.csv` plus the RDF rendering.
///
/// The ledger is validated wholesale before anything is written; a header
/// mismatch aborts with zero files on disk. Per-object skip policy, in
/// precedence order: missing directory (silent), looks packaged
/// (ask-and-skip), record already exists (one cached overwrite-all
/// decision for the whole run).
///
/// Record and rendering counts are independent — a rendering failure is
/// reported but does not invalidate the record it came from.
#[instrument(skip_all, fields(batch_root = %batch_root.display()))]
pub fn run(
    batch_root: &Path,
    ledger_path: &Path,
    id_column: &str,
    renderer: &Renderer,
    confirm: &dyn Confirm,
    decisions: &mut Decisions,
) -> Result<MetadataReport> {
    if !REQUIRED_HEADER.contains(&id_column) {
        tracing::error!(id_column, "identifier column is not part of the required header");
        exn::bail!(ErrorKind::Ledger);
    }
    let ledger = MasterLedger::open(ledger_path).or_raise(|| ErrorKind::Ledger)?;

    let mut report = MetadataReport::default();
    for row in ledger.rows() {
        let local_id = ledger.local_id_of(row, id_column).or_raise(|| ErrorKind::Ledger)?;
        let dir = match arca_object::resolve(batch_root, local_id) {
            Ok(dir) => dir,
            Err(err) => {
                tracing::warn!(local_id, error = %err, "unusable object name in ledger; skipping row");
                report.skipped += 1;
                continue;
            },
        };
        if !dir.exists() {
            tracing::debug!(local_id, "no matching directory; skipping row");
            report.skipped += 1;
            continue;
        }
        let object = Object::open(&dir).or_raise(|| ErrorKind::Objects)?;
        if object.looks_packaged()
            && confirm.confirm(&Prompt::SkipPackagedRecord { object: object.name().to_string() })
        {
            report.skipped += 1;
            continue;
        }
        if object.has_record() && !decisions.overwrite_all(confirm) {
            report.skipped += 1;
            continue;
        }
        match row.write(object.record_path()) {
            Ok(()) => report.records += 1,
            Err(err) => {
                tracing::warn!(local_id, error = %err, "failed to write record");
                report.skipped += 1;
                continue;
            },
        }
        match renderer.render_to(row, object.path()) {
            Ok(_) => report.renders += 1,
            Err(err) => tracing::warn!(local_id, error = %err, "rendering failed; record kept"),
        }
    }
    Ok(report)
}
