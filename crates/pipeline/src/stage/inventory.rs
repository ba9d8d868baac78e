//! Inventory stage: walk each object and write its manifest.

use crate::confirm::{Confirm, Prompt};
use crate::error::{ErrorKind, Result};
use crate::report::InventoryReport;
use arca_digest::{Digest, sums};
use arca_ledger::{ManifestEntry, ManifestWriter};
use arca_object::{Object, objects_in, walk};
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

/// Write a `manifest.csv` for every object that does not already have one
/// and is not already packaged.
///
/// Both checksums are computed per file in a single read pass, and the
/// manifest itself is staged in a temporary file and atomically renamed
/// into place — a half-written manifest is never visible under the final
/// name, so an interrupted run can simply be re-run.
#[instrument(skip_all, fields(batch_root = %batch_root.display()))]
pub fn run(batch_root: &Path, fast: Digest, strong: Digest, confirm: &dyn Confirm) -> Result<InventoryReport> {
    let mut report = InventoryReport::default();
    for object in objects_in(batch_root).or_raise(|| ErrorKind::Objects)? {
        if object.looks_packaged()
            && confirm.confirm(&Prompt::SkipPackagedInventory { object: object.name().to_string() })
        {
            report.skipped += 1;
            continue;
        }
        if object.has_manifest() {
            confirm.acknowledge(&format!(
                "'manifest.csv' already exists; skipping inventory of '{}'",
                object.name(),
            ));
            report.skipped += 1;
            continue;
        }
        match inventory_object(&object, batch_root, fast, strong) {
            Ok(rows) => {
                tracing::info!(object = object.name(), rows, "manifest created");
                report.manifests += 1;
            },
            Err(err) => {
                tracing::warn!(object = object.name(), error = %err, "inventory failed");
                report.failed += 1;
            },
        }
    }
    Ok(report)
}

fn inventory_object(object: &Object, batch_root: &Path, fast: Digest, strong: Digest) -> Result<u64> {
    let files = walk(object.path(), batch_root).or_raise(|| ErrorKind::Objects)?;
    let mut writer =
        ManifestWriter::create(object.manifest_path(), fast, strong).or_raise(|| ErrorKind::Artifact)?;
    for (index, file) in files.iter().enumerate() {
        let mut file_sums = sums(&file.path, &[fast, strong]).or_raise(|| ErrorKind::Checksum)?;
        let strong_sum = file_sums.pop().unwrap_or_default();
        let fast_sum = file_sums.pop().unwrap_or_default();
        writer
            .push(&ManifestEntry::new(index as u64 + 1, file, fast_sum, strong_sum))
            .or_raise(|| ErrorKind::Artifact)?;
    }
    writer.finish().or_raise(|| ErrorKind::Artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::BatchConfirm;
    use std::fs;

    #[test]
    fn test_manifest_rows_match_file_count() {
        let batch = tempfile::tempdir().unwrap();
        let object = batch.path().join("obj-001");
        fs::create_dir_all(object.join("nested")).unwrap();
        fs::write(object.join("one.txt"), b"1").unwrap();
        fs::write(object.join("nested/two.txt"), b"2").unwrap();
        fs::write(object.join("nested/three.txt"), b"3").unwrap();

        let report = run(batch.path(), Digest::Md5, Digest::Sha3_256, &BatchConfirm).unwrap();
        assert_eq!(report.manifests, 1);

        let raw = fs::read_to_string(object.join("manifest.csv")).unwrap();
        // Header + 3 data rows + trailing comment row.
        assert_eq!(raw.lines().count(), 5);

        // Strong digests recompute to the same value.
        for line in raw.lines().skip(1).take(3) {
            let fields: Vec<&str> = line.split(',').collect();
            let rel_path = fields[10];
            let recomputed =
                sums(batch.path().join(rel_path), &[Digest::Sha3_256]).unwrap().remove(0);
            assert_eq!(fields[8], recomputed);
        }
    }

    #[test]
    fn test_existing_manifest_is_not_replaced() {
        let batch = tempfile::tempdir().unwrap();
        let object = batch.path().join("obj-001");
        fs::create_dir(&object).unwrap();
        fs::write(object.join("manifest.csv"), b"pre-existing").unwrap();
        let report = run(batch.path(), Digest::Md5, Digest::Sha3_256, &BatchConfirm).unwrap();
        assert_eq!((report.manifests, report.skipped), (0, 1));
        assert_eq!(fs::read(object.join("manifest.csv")).unwrap(), b"pre-existing");
    }

    #[test]
    fn test_packaged_object_is_skipped_by_default() {
        let batch = tempfile::tempdir().unwrap();
        let object = batch.path().join("obj-001");
        fs::create_dir_all(object.join("data")).unwrap();
        fs::write(object.join("data/file.txt"), b"x").unwrap();
        let report = run(batch.path(), Digest::Md5, Digest::Sha3_256, &BatchConfirm).unwrap();
        assert_eq!((report.manifests, report.skipped), (0, 1));
        assert!(!object.join("manifest.csv").exists());
    }
}
