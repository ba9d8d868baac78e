//! The stage runner: fixed order, per-stage reports, stop-on-unrecoverable.

use crate::confirm::{Confirm, Decisions, Prompt};
use crate::error::{ErrorKind, Result};
use crate::report::{MetadataReport, Summary};
use crate::stage::{archive, fixity, inventory, metadata, prepack, register, transfer};
use arca_digest::Digest;
use arca_ledger::Renderer;
use arca_mint::Authority;
use arca_pack::{Archiver, Compression, Packager};
use exn::ResultExt;
use std::path::PathBuf;
use tracing::instrument;

/// A pipeline stage. The declaration order here *is* the execution order;
/// a run executes the enabled subset of this sequence, never a different
/// permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Prepack,
    Metadata,
    Register,
    Inventory,
    Fixity,
    Archive,
    Transfer,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ORDER: [Stage; 7] = [
        Stage::Prepack,
        Stage::Metadata,
        Stage::Register,
        Stage::Inventory,
        Stage::Fixity,
        Stage::Archive,
        Stage::Transfer,
    ];

    /// The default selection: everything except pre-pack restructuring,
    /// which is only wanted the first time a batch is touched.
    pub const DEFAULT: [Stage; 6] = [
        Stage::Metadata,
        Stage::Register,
        Stage::Inventory,
        Stage::Fixity,
        Stage::Archive,
        Stage::Transfer,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Prepack => "pre-pack",
            Stage::Metadata => "metadata",
            Stage::Register => "register",
            Stage::Inventory => "inventory",
            Stage::Fixity => "fixity",
            Stage::Archive => "archive",
            Stage::Transfer => "transfer",
        }
    }
}

/// One batch run: the target directory, the knobs, and the collaborators.
///
/// Collaborators come in as trait objects so the front-end chooses them:
/// an interactive or batch [`Confirm`], a local or remote identifier
/// [`Authority`], the built-in or an external [`Packager`].
pub struct Pipeline<'a> {
    pub batch_root: PathBuf,
    /// Master ledger path; required when the metadata stage is enabled.
    pub ledger_path: Option<PathBuf>,
    /// Header column holding each object's local identifier.
    pub id_column: String,
    /// Manifest digests: fast and strong.
    pub fast: Digest,
    pub strong: Digest,
    /// Algorithms requested from the fixity packager.
    pub packaging: Vec<Digest>,
    /// Archive compression (plain tar unless gzip is asked for).
    pub compression: Compression,
    /// Directory for the transfer ledger; defaults to the archived output.
    pub transfer_dir: Option<PathBuf>,
    pub authority: &'a dyn Authority,
    pub packager: &'a dyn Packager,
    pub confirm: &'a dyn Confirm,
}

impl Pipeline<'_> {
    /// Run the enabled stages, strictly in [`Stage::ORDER`], one stage to
    /// completion across the whole batch before the next begins.
    ///
    /// Between stages the operator is asked whether to proceed (the batch
    /// policy always says yes). An unrecoverable stage failure — a
    /// rejected ledger above all — stops the pipeline; the summary records
    /// how far it got. Re-running is safe purely through the stages' own
    /// skip logic; nothing is rolled back.
    #[instrument(skip_all, fields(batch_root = %self.batch_root.display()))]
    pub fn run(&self, stages: &[Stage]) -> Result<Summary> {
        if !self.batch_root.is_dir() {
            exn::bail!(ErrorKind::MissingDirectory(self.batch_root.clone()));
        }
        let renderer = Renderer::new().or_raise(|| ErrorKind::Ledger)?;
        let archiver = Archiver::new(self.compression);
        let mut decisions = Decisions::default();
        let mut summary = Summary::default();
        let enabled: Vec<Stage> =
            Stage::ORDER.iter().copied().filter(|stage| stages.contains(stage)).collect();

        for (index, stage) in enabled.iter().enumerate() {
            let outcome: Result<String> = match stage {
                Stage::Prepack => prepack::run(&self.batch_root).map(|report| {
                    let line = report.to_string();
                    summary.prepack = Some(report);
                    line
                }),
                Stage::Metadata => self.ledger_path.as_deref().map_or_else(
                    || Err(exn::Exn::from(ErrorKind::NoLedger)),
                    |ledger_path| {
                        metadata::run(
                            &self.batch_root,
                            ledger_path,
                            &self.id_column,
                            &renderer,
                            self.confirm,
                            &mut decisions,
                        )
                        .map(|report| {
                            let line = report.to_string();
                            summary.metadata = Some(report);
                            line
                        })
                    },
                ),
                Stage::Register => {
                    register::run(&self.batch_root, self.authority, &renderer, self.confirm).map(
                        |report| {
                            let line = report.to_string();
                            summary.register = Some(report);
                            line
                        },
                    )
                },
                Stage::Inventory => {
                    inventory::run(&self.batch_root, self.fast, self.strong, self.confirm).map(
                        |report| {
                            let line = report.to_string();
                            summary.inventory = Some(report);
                            line
                        },
                    )
                },
                Stage::Fixity => {
                    fixity::run(&self.batch_root, &self.packaging, self.packager, self.confirm)
                        .map(|report| {
                            let line = report.to_string();
                            summary.fixity = Some(report);
                            line
                        })
                },
                Stage::Archive => {
                    archive::run(&self.batch_root, &archiver, self.confirm).map(|report| {
                        let line = report.to_string();
                        summary.archive = Some(report);
                        line
                    })
                },
                Stage::Transfer => {
                    let transfer_dir = self
                        .transfer_dir
                        .clone()
                        .unwrap_or_else(|| archive::archived_dir(&self.batch_root));
                    transfer::run(&transfer_dir, self.strong).map(|report| {
                        let line = report.to_string();
                        summary.transfer = Some(report);
                        line
                    })
                },
            };

            let line = match outcome {
                Ok(line) => line,
                Err(err) => {
                    // A rejected ledger still reports its zeroed counts.
                    if matches!(stage, Stage::Metadata) {
                        summary.metadata.get_or_insert(MetadataReport::default());
                    }
                    tracing::error!(stage = stage.name(), error = %err, "stage aborted; stopping pipeline");
                    summary.stopped = Some(format!("{} stage aborted", stage.name()));
                    summary.aborted = true;
                    break;
                },
            };
            tracing::info!(stage = stage.name(), "{line}");

            let remaining = enabled.len() - index - 1;
            if remaining > 0
                && !self.confirm.confirm(&Prompt::ProceedToNextStage { finished: line })
            {
                summary.stopped = Some(format!("stopped by operator after the {} stage", stage.name()));
                break;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::BatchConfirm;
    use arca_ledger::REQUIRED_HEADER;
    use arca_mint::RandomAuthority;
    use arca_object::objects_in;
    use arca_pack::BagPackager;
    use std::fs;
    use std::path::Path;

    fn seed_batch(root: &Path) -> PathBuf {
        let batch = root.join("batch");
        fs::create_dir_all(batch.join("A/images")).unwrap();
        fs::create_dir_all(batch.join("B")).unwrap();
        fs::write(batch.join("A/notes.txt"), b"notes for A").unwrap();
        fs::write(batch.join("A/images/plate.tif"), b"plate").unwrap();
        fs::write(batch.join("B/report.pdf"), b"report for B").unwrap();
        let mut ledger = format!("{}\n", REQUIRED_HEADER.join(","));
        ledger.push_str(",A,Special Collections,limen,Baxter,first,https://x/a,https://x/c\n");
        ledger.push_str(",B,Special Collections,limen,Baxter,second,https://x/b,https://x/c\n");
        fs::write(batch.join("../master.csv"), ledger).unwrap();
        batch
    }

    fn pipeline<'a>(
        batch: &Path,
        authority: &'a RandomAuthority,
        confirm: &'a BatchConfirm,
        packager: &'a BagPackager,
    ) -> Pipeline<'a> {
        Pipeline {
            batch_root: batch.to_path_buf(),
            ledger_path: Some(batch.parent().unwrap().join("master.csv")),
            id_column: "Local ID".to_string(),
            fast: Digest::Md5,
            strong: Digest::Sha3_256,
            packaging: vec![Digest::Md5, Digest::Sha512],
            compression: Compression::None,
            transfer_dir: None,
            authority,
            packager,
            confirm,
        }
    }

    #[test]
    fn test_end_to_end_batch() {
        let dir = tempfile::tempdir().unwrap();
        let batch = seed_batch(dir.path());
        let authority = RandomAuthority::default();
        let (confirm, packager) = (BatchConfirm, BagPackager);
        let pipeline = pipeline(&batch, &authority, &confirm, &packager);

        let summary = pipeline.run(&Stage::DEFAULT).unwrap();
        assert!(summary.is_complete(), "stopped: {:?}", summary.stopped);
        assert_eq!(summary.metadata.unwrap().records, 2);
        assert_eq!(summary.register.unwrap().registered, 2);
        assert_eq!(summary.inventory.unwrap().manifests, 2);
        let fixity = summary.fixity.unwrap();
        assert_eq!((fixity.attempted, fixity.valid), (2, 2));
        assert_eq!(summary.archive.unwrap().created, 2);
        assert_eq!(summary.transfer.unwrap().files, 2);

        // Both objects renamed to fresh system identifiers and packaged.
        let objects = objects_in(&batch).unwrap();
        assert_eq!(objects.len(), 2);
        for object in &objects {
            assert!(object.name().starts_with("vtdata_"));
            assert!(object.path().join("bagit.txt").exists());
            // Record, rendering and manifest travelled into the payload.
            let record_path = object.path().join("data/metadata.csv");
            let record = arca_ledger::MetadataRecord::read(&record_path).unwrap();
            assert_eq!(record.system_id, object.name());
            assert!(object.path().join("data/metadata.xml").exists());
            assert!(object.path().join("data/manifest.csv").exists());
        }

        // One archive per object in the sibling output directory, and a
        // transfer ledger one level above it.
        let archived = archive::archived_dir(&batch);
        assert_eq!(fs::read_dir(&archived).unwrap().count(), 2);
        let ledgers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| {
                let name = entry.unwrap().file_name().to_string_lossy().into_owned();
                name.starts_with("Transfer_batch-archived_").then_some(name)
            })
            .collect();
        assert_eq!(ledgers.len(), 1);
    }

    #[test]
    fn test_rejected_ledger_stops_the_pipeline_with_zero_counts() {
        let dir = tempfile::tempdir().unwrap();
        let batch = seed_batch(dir.path());
        fs::write(batch.parent().unwrap().join("master.csv"), "Wrong,Header\nA,B\n").unwrap();
        let authority = RandomAuthority::default();
        let (confirm, packager) = (BatchConfirm, BagPackager);
        let pipeline = pipeline(&batch, &authority, &confirm, &packager);

        let summary = pipeline.run(&Stage::DEFAULT).unwrap();
        assert!(!summary.is_complete());
        let metadata = summary.metadata.unwrap();
        assert_eq!((metadata.records, metadata.renders), (0, 0));
        // Nothing after the metadata stage ran.
        assert!(summary.register.is_none());
        assert!(!batch.join("A/metadata.csv").exists());
        assert!(!batch.join("log4preservation.csv").exists());
    }

    #[test]
    fn test_missing_batch_root() {
        let dir = tempfile::tempdir().unwrap();
        let authority = RandomAuthority::default();
        let (confirm, packager) = (BatchConfirm, BagPackager);
        let mut pipeline = pipeline(&dir.path().join("absent"), &authority, &confirm, &packager);
        pipeline.ledger_path = None;
        let err = pipeline.run(&[Stage::Inventory]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingDirectory(_)));
    }
}
