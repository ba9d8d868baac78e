//! Pre-pack restructuring: push each object's contents one level deeper
//! before any identifier-bearing rename happens.
//!
//! Departments drop flat folders; preservation wants the original folder
//! name kept *inside* the object once the directory itself gets renamed to
//! a system identifier. The restructuring is a strict three-phase
//! sequence per object — copy everything into a staging directory, prune
//! the originals (sparing metadata-marked files), rename the staging copy
//! into place — with the rename as the sole commit point. An interruption
//! before the rename leaves the original contents intact next to a stale
//! staging copy; it never leaves a partially deleted object.

use crate::error::{ErrorKind, Result};
use crate::report::PrepackReport;
use arca_object::{names, objects_in};
use exn::ResultExt;
use std::fs;
use std::path::Path;
use tracing::instrument;

/// Restructure every immediate subdirectory of the batch root.
#[instrument(skip_all, fields(batch_root = %batch_root.display()))]
pub fn run(batch_root: &Path) -> Result<PrepackReport> {
    let mut report = PrepackReport::default();
    for object in objects_in(batch_root).or_raise(|| ErrorKind::Objects)? {
        restructure(object.path())?;
        tracing::info!(object = object.name(), "pre-packaged");
        report.restructured += 1;
    }
    Ok(report)
}

fn restructure(dir: &Path) -> Result<()> {
    // Phase 1: copy. Nothing is destroyed before the copy exists.
    let staging = tempfile::tempdir_in(dir).map_err(ErrorKind::Io)?.keep();
    copy_tree(dir, &staging, &staging)?;

    // Phase 2: prune the originals, sparing anything metadata-marked.
    // Snapshot the listing first; deleting while iterating read_dir can
    // make it skip entries.
    let entries: Vec<_> = fs::read_dir(dir)
        .map_err(ErrorKind::Io)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(ErrorKind::Io)?;
    for entry in entries {
        let path = entry.path();
        if path == staging {
            continue;
        }
        if path.is_dir() {
            fs::remove_dir_all(&path).map_err(ErrorKind::Io)?;
        } else if !entry.file_name().to_string_lossy().contains(names::META_MARKER) {
            fs::remove_file(&path).map_err(ErrorKind::Io)?;
        }
    }

    // Phase 3: commit. The staging copy becomes the nested object.
    let base = dir.file_name().unwrap_or_default();
    fs::rename(&staging, dir.join(base)).map_err(ErrorKind::Io)?;
    Ok(())
}

/// Recursive copy of `src` into `dst`, skipping the staging directory
/// itself (it lives inside `src`). Symbolic links are not copied, matching
/// the walker's refusal to follow them.
fn copy_tree(src: &Path, dst: &Path, skip: &Path) -> Result<()> {
    for entry in fs::read_dir(src).map_err(ErrorKind::Io)? {
        let entry = entry.map_err(ErrorKind::Io)?;
        let path = entry.path();
        if path == skip {
            continue;
        }
        let file_type = entry.file_type().map_err(ErrorKind::Io)?;
        let target = dst.join(entry.file_name());
        if file_type.is_dir() {
            fs::create_dir(&target).map_err(ErrorKind::Io)?;
            copy_tree(&path, &target, skip)?;
        } else if file_type.is_file() {
            fs::copy(&path, &target).map_err(ErrorKind::Io)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_are_pushed_one_level_deeper() {
        let batch = tempfile::tempdir().unwrap();
        let object = batch.path().join("Acc2019_Baxter");
        fs::create_dir_all(object.join("images")).unwrap();
        fs::write(object.join("notes.txt"), b"notes").unwrap();
        fs::write(object.join("images/plate.tif"), b"tif").unwrap();

        let report = run(batch.path()).unwrap();
        assert_eq!(report.restructured, 1);

        let nested = object.join("Acc2019_Baxter");
        assert_eq!(fs::read(nested.join("notes.txt")).unwrap(), b"notes");
        assert_eq!(fs::read(nested.join("images/plate.tif")).unwrap(), b"tif");
        // The originals were pruned from the top level.
        assert!(!object.join("notes.txt").exists());
        assert!(!object.join("images").exists());
    }

    #[test]
    fn test_metadata_marked_files_survive_at_top_level() {
        let batch = tempfile::tempdir().unwrap();
        let object = batch.path().join("obj-001");
        fs::create_dir(&object).unwrap();
        fs::write(object.join("metadata.csv"), b"record").unwrap();
        fs::write(object.join("payload.bin"), b"payload").unwrap();

        run(batch.path()).unwrap();

        // The record stays addressable at the top, and the nested copy
        // carries everything, record included.
        assert!(object.join("metadata.csv").exists());
        assert!(!object.join("payload.bin").exists());
        assert!(object.join("obj-001/metadata.csv").exists());
        assert!(object.join("obj-001/payload.bin").exists());
    }
}
