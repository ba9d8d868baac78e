//! Archiving stage: serialise each object into a single archive file in a
//! sibling output directory.

use crate::confirm::Confirm;
use crate::error::{ErrorKind, Result};
use crate::report::ArchiveReport;
use arca_pack::{Archiver, Outcome};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// The sibling output directory for a batch root: `<source>-archived`.
#[must_use]
pub fn archived_dir(source: &Path) -> PathBuf {
    let mut name = source.as_os_str().to_os_string();
    name.push("-archived");
    PathBuf::from(name)
}

/// Archive every directory entry of `source` into `<source>-archived`.
///
/// The output directory is created once and reused. Existing archives are
/// counted as already-archived and never overwritten; top-level
/// non-directory entries are counted and ignored.
#[instrument(skip_all, fields(source = %source.display()))]
pub fn run(source: &Path, archiver: &Archiver, confirm: &dyn Confirm) -> Result<ArchiveReport> {
    if !source.is_dir() {
        exn::bail!(ErrorKind::MissingDirectory(source.to_path_buf()));
    }
    let out = archived_dir(source);
    if !out.exists() {
        fs::create_dir(&out).map_err(ErrorKind::Io)?;
    }

    let mut report = ArchiveReport::default();
    let mut entries: Vec<PathBuf> = fs::read_dir(source)
        .map_err(ErrorKind::Io)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(ErrorKind::Io)?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();
    for entry in entries {
        if !entry.is_dir() {
            report.ignored += 1;
            continue;
        }
        match archiver.archive(&entry, &out).or_raise(|| ErrorKind::Packaging) {
            Ok(Outcome::Created(_)) => report.created += 1,
            Ok(Outcome::AlreadyExists(existing)) => {
                confirm.acknowledge(&format!(
                    "the archive '{}' already exists; not re-created",
                    existing.display(),
                ));
                report.already_archived += 1;
            },
            Err(err) => {
                tracing::warn!(object = %entry.display(), error = %err, "archiving failed");
                report.failed += 1;
            },
        }
    }
    Ok(report)
}
