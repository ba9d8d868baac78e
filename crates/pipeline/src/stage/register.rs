//! Registration stage: mint system identifiers and transition object
//! identity from local name to system name.

use crate::confirm::Confirm;
use crate::error::{ErrorKind, Result};
use crate::report::RegisterReport;
use arca_ledger::{AuditEntry, AuditLog, MetadataRecord, Renderer};
use arca_mint::Authority;
use arca_object::{Object, names, objects_in};
use exn::ResultExt;
use std::fs;
use std::path::Path;
use tracing::instrument;

enum Registered {
    /// Fresh identifier assigned, record updated, directory renamed.
    Renamed { rendered: bool },
    /// Directory name already equals the record's system identifier —
    /// never re-identified.
    Already,
}

/// Register every immediate subdirectory of the batch root that carries a
/// metadata record.
///
/// Per object: mint an identifier, rewrite the record's identifier field,
/// append one audit entry, re-render the secondary metadata, and — as the
/// very last filesystem operation — rename the directory to the system
/// identifier. A crash mid-stage therefore leaves at most an
/// updated-but-unrenamed object, never a renamed-but-unupdated one.
#[instrument(skip_all, fields(batch_root = %batch_root.display()))]
pub fn run(
    batch_root: &Path,
    authority: &dyn Authority,
    renderer: &Renderer,
    confirm: &dyn Confirm,
) -> Result<RegisterReport> {
    let audit = AuditLog::ensure(batch_root.join(names::AUDIT_LOG)).or_raise(|| ErrorKind::Ledger)?;
    let mut report = RegisterReport::default();
    for object in objects_in(batch_root).or_raise(|| ErrorKind::Objects)? {
        if !object.has_record() {
            // Precondition violation for this object, not fatal to the batch.
            confirm.acknowledge(&format!(
                "could not find '{}'; skipping registration of '{}'",
                object.record_path().display(),
                object.name(),
            ));
            report.skipped += 1;
            continue;
        }
        match register_object(&object, batch_root, authority, renderer, &audit) {
            Ok(Registered::Renamed { rendered }) => {
                report.registered += 1;
                if rendered {
                    report.renders += 1;
                }
            },
            Ok(Registered::Already) => {
                tracing::debug!(object = object.name(), "already registered");
                report.skipped += 1;
            },
            Err(err) => {
                tracing::warn!(object = object.name(), error = %err, "registration failed");
                report.failed += 1;
            },
        }
    }
    Ok(report)
}

fn register_object(
    object: &Object,
    batch_root: &Path,
    authority: &dyn Authority,
    renderer: &Renderer,
    audit: &AuditLog,
) -> Result<Registered> {
    let mut record = MetadataRecord::read(object.record_path()).or_raise(|| ErrorKind::Ledger)?;
    // Idempotence: an object whose directory already bears its recorded
    // system identifier is never re-identified.
    if !record.system_id.is_empty() && record.system_id == object.name() {
        return Ok(Registered::Already);
    }

    let id = authority.mint().or_raise(|| ErrorKind::Minting)?;
    record.set_system_id(id.as_str());
    audit
        .append(&AuditEntry::now(id.as_str(), &record.local_id, &record.person))
        .or_raise(|| ErrorKind::Ledger)?;
    record.write(object.record_path()).or_raise(|| ErrorKind::Ledger)?;

    // The old rendering carries the old identifier; replace it outright.
    let rendering = object.rendering_path();
    if rendering.exists() {
        fs::remove_file(&rendering).map_err(ErrorKind::Io)?;
    }
    let rendered = match renderer.render_to(&record, object.path()) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(object = object.name(), error = %err, "rendering failed; record kept");
            false
        },
    };

    // The identity transition. Last on purpose: everything above addresses
    // the object by its old path.
    fs::rename(object.path(), batch_root.join(id.as_str())).map_err(ErrorKind::Io)?;
    tracing::info!(local = object.name(), system = id.as_str(), "object registered");
    Ok(Registered::Renamed { rendered })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::BatchConfirm;
    use arca_ledger::REQUIRED_HEADER;
    use arca_mint::RandomAuthority;

    fn seed_object(batch: &Path, local_id: &str) {
        let dir = batch.join(local_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("content.txt"), b"payload").unwrap();
        let record = format!(
            "{}\n,{local_id},Special Collections,limen,Baxter,desc,https://x/o,https://x/c\n",
            REQUIRED_HEADER.join(","),
        );
        fs::write(dir.join("metadata.csv"), record).unwrap();
    }

    fn registered_names(batch: &Path) -> Vec<String> {
        objects_in(batch).unwrap().iter().map(|o| o.name().to_string()).collect()
    }

    #[test]
    fn test_registration_renames_and_logs() {
        let batch = tempfile::tempdir().unwrap();
        seed_object(batch.path(), "obj-001");
        seed_object(batch.path(), "obj-002");
        let renderer = Renderer::new().unwrap();
        let report = run(batch.path(), &RandomAuthority::default(), &renderer, &BatchConfirm).unwrap();
        assert_eq!((report.registered, report.skipped, report.failed), (2, 0, 0));

        let names = registered_names(batch.path());
        assert!(names.iter().all(|name| name.starts_with("vtdata_")));
        for name in &names {
            let record =
                MetadataRecord::read(batch.path().join(name).join("metadata.csv")).unwrap();
            assert_eq!(&record.system_id, name);
            assert!(batch.path().join(name).join("metadata.xml").exists());
        }
        let audit = AuditLog::ensure(batch.path().join(names::AUDIT_LOG)).unwrap();
        assert_eq!(audit.entries().unwrap().len(), 2);
    }

    #[test]
    fn test_registration_is_idempotent() {
        let batch = tempfile::tempdir().unwrap();
        seed_object(batch.path(), "obj-001");
        let renderer = Renderer::new().unwrap();
        let authority = RandomAuthority::default();
        let first = run(batch.path(), &authority, &renderer, &BatchConfirm).unwrap();
        assert_eq!(first.registered, 1);
        let names_after_first = registered_names(batch.path());

        let second = run(batch.path(), &authority, &renderer, &BatchConfirm).unwrap();
        assert_eq!((second.registered, second.skipped), (0, 1));
        assert_eq!(registered_names(batch.path()), names_after_first);
        let audit = AuditLog::ensure(batch.path().join(names::AUDIT_LOG)).unwrap();
        assert_eq!(audit.entries().unwrap().len(), 1);
    }

    #[test]
    fn test_recordless_directory_is_warned_and_skipped() {
        let batch = tempfile::tempdir().unwrap();
        fs::create_dir(batch.path().join("no-record")).unwrap();
        let renderer = Renderer::new().unwrap();
        let report = run(batch.path(), &RandomAuthority::default(), &renderer, &BatchConfirm).unwrap();
        assert_eq!((report.registered, report.skipped), (0, 1));
        assert!(batch.path().join("no-record").exists());
    }
}
