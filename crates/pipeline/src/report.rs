//! Per-stage counters and the batch summary.
//!
//! Skips and declined actions are outcomes, not errors; every stage
//! reports what it did, what it skipped and what failed so a re-run can be
//! judged against the previous one.

use derive_more::Display;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("pre-packaged {restructured} objects")]
pub struct PrepackReport {
    pub restructured: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("created {records} 'metadata.csv' and {renders} 'metadata.xml' files ({skipped} skipped)")]
pub struct MetadataReport {
    /// Records written
    pub records: u64,
    /// Secondary renderings written; counted independently of `records`
    /// because a rendering failure does not invalidate the record.
    pub renders: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("registered {registered} objects ({skipped} skipped, {failed} failed)")]
pub struct RegisterReport {
    /// Objects renamed to a fresh system identifier
    pub registered: u64,
    /// Renderings rewritten after the identifier update
    pub renders: u64,
    /// Missing-record and already-registered objects
    pub skipped: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("created {manifests} 'manifest.csv' files ({skipped} skipped, {failed} failed)")]
pub struct InventoryReport {
    pub manifests: u64,
    pub skipped: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("created {attempted} total packages, of which {valid} are valid")]
pub struct FixityReport {
    pub attempted: u64,
    pub valid: u64,
    pub skipped: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display("created {created} archives ({already_archived} already archived, {ignored} non-folders ignored)")]
pub struct ArchiveReport {
    pub created: u64,
    /// Existing archives, never overwritten
    pub already_archived: u64,
    /// Top-level non-directory entries
    pub ignored: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Display)]
#[display("transfer ledger lists {files} files")]
pub struct TransferReport {
    pub files: u64,
    pub ledger: Option<PathBuf>,
}

/// Everything one pipeline run did, stage by stage.
///
/// A stage's slot stays `None` when the stage was not enabled (or never
/// reached); `stopped` records why a run ended early, if it did.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub prepack: Option<PrepackReport>,
    pub metadata: Option<MetadataReport>,
    pub register: Option<RegisterReport>,
    pub inventory: Option<InventoryReport>,
    pub fixity: Option<FixityReport>,
    pub archive: Option<ArchiveReport>,
    pub transfer: Option<TransferReport>,
    /// Why the pipeline stopped before finishing, when it did.
    pub stopped: Option<String>,
    /// `true` when the stop was an unrecoverable stage failure rather than
    /// an operator choosing not to continue.
    pub aborted: bool,
}

impl Summary {
    pub fn is_complete(&self) -> bool {
        self.stopped.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines_read_like_the_prompts() {
        let report = MetadataReport { records: 4, renders: 3, skipped: 1 };
        assert_eq!(report.to_string(), "created 4 'metadata.csv' and 3 'metadata.xml' files (1 skipped)");
        let report = FixityReport { attempted: 2, valid: 2, ..FixityReport::default() };
        assert_eq!(report.to_string(), "created 2 total packages, of which 2 are valid");
    }
}
