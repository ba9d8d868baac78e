//! Fixity packaging stage: conform each object to the packaging
//! convention and check the result's validity.

use crate::confirm::{Confirm, Prompt};
use crate::error::{ErrorKind, Result};
use crate::report::FixityReport;
use arca_digest::Digest;
use arca_object::objects_in;
use arca_pack::Packager;
use exn::ResultExt;
use std::path::Path;
use tracing::instrument;

/// Package every immediate subdirectory of the batch root.
///
/// An object that already looks packaged is only re-packaged when the
/// operator confirms "package anyway". Every produced package is asked for
/// its validity predicate; invalid packages are reported individually and
/// never silently accepted — but they do not block later stages.
#[instrument(skip_all, fields(batch_root = %batch_root.display()))]
pub fn run(
    batch_root: &Path,
    algorithms: &[Digest],
    packager: &dyn Packager,
    confirm: &dyn Confirm,
) -> Result<FixityReport> {
    let mut report = FixityReport::default();
    for object in objects_in(batch_root).or_raise(|| ErrorKind::Objects)? {
        if object.looks_packaged()
            && !confirm.confirm(&Prompt::PackageAnyway { object: object.name().to_string() })
        {
            report.skipped += 1;
            continue;
        }
        match packager.pack(object.path(), algorithms) {
            Ok(package) => {
                report.attempted += 1;
                if package.is_valid() {
                    report.valid += 1;
                } else {
                    confirm.acknowledge(&format!("package '{}' is not valid", object.name()));
                }
            },
            Err(err) => {
                tracing::warn!(object = object.name(), error = %err, "packaging failed");
                report.failed += 1;
            },
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::BatchConfirm;
    use arca_pack::BagPackager;
    use std::fs;

    const ALGORITHMS: [Digest; 2] = [Digest::Md5, Digest::Sha512];

    #[test]
    fn test_packages_and_validates() {
        let batch = tempfile::tempdir().unwrap();
        let object = batch.path().join("obj-001");
        fs::create_dir(&object).unwrap();
        fs::write(object.join("content.txt"), b"payload").unwrap();

        let report = run(batch.path(), &ALGORITHMS, &BagPackager, &BatchConfirm).unwrap();
        assert_eq!((report.attempted, report.valid), (1, 1));
        assert!(object.join("bagit.txt").exists());
        assert!(object.join("data/content.txt").exists());
        assert!(object.join("manifest-sha512.txt").exists());
    }

    #[test]
    fn test_already_packaged_is_skipped_by_default() {
        let batch = tempfile::tempdir().unwrap();
        let object = batch.path().join("obj-001");
        fs::create_dir_all(object.join("data")).unwrap();
        fs::write(object.join("data/content.txt"), b"payload").unwrap();

        let report = run(batch.path(), &ALGORITHMS, &BagPackager, &BatchConfirm).unwrap();
        assert_eq!((report.attempted, report.skipped), (0, 1));
        // Not double-packaged: no nested data/data.
        assert!(!object.join("data/data").exists());
    }
}
