//! Recursive, deterministic tree walking with attribute snapshots.
//!
//! The walker exists to feed the inventory and transfer-ledger stages, so
//! its guarantees are theirs: the same tree walked twice yields the same
//! entries in the same order (manifest diffs stay meaningful), OS artifact
//! files are deleted from disk rather than listed, and symbolic links are
//! never followed (no infinite recursion, no escape from the subtree).

use crate::error::{ErrorKind, Result};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Sentinel files various operating systems scatter into directories.
/// These are junk from a preservation standpoint: deleted on sight.
const ARTIFACTS: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

/// Whether a file name is a known OS artifact.
///
/// `._*` covers AppleDouble resource forks left behind on non-HFS mounts.
#[must_use]
pub fn is_artifact(name: &str) -> bool {
    ARTIFACTS.contains(&name) || name.starts_with("._")
}

/// A snapshot of a file's filesystem attributes, taken at enumeration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAttrs {
    /// File size in bytes
    pub size: u64,
    /// Metadata change time on Unix ("date created" on Windows)
    pub changed: Option<OffsetDateTime>,
    /// Last modification time
    pub modified: Option<OffsetDateTime>,
    /// Last access time
    pub accessed: Option<OffsetDateTime>,
    /// Raw permission/mode bits
    pub mode: u32,
    /// Inode number
    pub inode: u64,
    /// Device number
    pub device: u64,
    /// Hard link count
    pub links: u64,
    /// Owning user id
    pub uid: u32,
    /// Owning group id
    pub gid: u32,
}

impl FileAttrs {
    #[cfg(unix)]
    fn from_metadata(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            size: metadata.len(),
            changed: OffsetDateTime::from_unix_timestamp(metadata.ctime()).ok(),
            modified: metadata.modified().ok().map(Into::into),
            accessed: metadata.accessed().ok().map(Into::into),
            mode: metadata.mode(),
            inode: metadata.ino(),
            device: metadata.dev(),
            links: metadata.nlink(),
            uid: metadata.uid(),
            gid: metadata.gid(),
        }
    }

    #[cfg(not(unix))]
    fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            changed: metadata.created().ok().map(Into::into),
            modified: metadata.modified().ok().map(Into::into),
            accessed: metadata.accessed().ok().map(Into::into),
            mode: 0,
            inode: 0,
            device: 0,
            links: 0,
            uid: 0,
            gid: 0,
        }
    }
}

/// One file encountered during a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the batch root (not the object root)
    pub rel_path: PathBuf,
    /// File name
    pub name: String,
    /// Attribute snapshot taken at enumeration time
    pub attrs: FileAttrs,
}

/// Recursively enumerate every file beneath `root`.
///
/// Within each directory the files are emitted first (lexical order), then
/// each subdirectory's contents (lexical order) — stable across runs.
/// Relative paths are computed against `batch_root`, which must be an
/// ancestor of (or equal to) `root`.
///
/// Known OS artifact files are **deleted from disk** and not emitted.
/// Symbolic links are skipped entirely.
pub fn walk(root: impl AsRef<Path>, batch_root: impl AsRef<Path>) -> Result<Vec<FileEntry>> {
    let root = root.as_ref();
    if !root.is_dir() {
        exn::bail!(ErrorKind::NotADirectory(root.to_path_buf()));
    }
    let mut entries = Vec::new();
    walk_dir(root, batch_root.as_ref(), &mut entries)?;
    Ok(entries)
}

fn walk_dir(dir: &Path, batch_root: &Path, out: &mut Vec<FileEntry>) -> Result<()> {
    let mut listing: Vec<fs::DirEntry> = fs::read_dir(dir)
        .map_err(ErrorKind::Io)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(ErrorKind::Io)?;
    listing.sort_by_key(fs::DirEntry::file_name);

    let mut subdirs = Vec::new();
    for entry in listing {
        let file_type = entry.file_type().map_err(ErrorKind::Io)?;
        if file_type.is_symlink() {
            tracing::debug!(path = %entry.path().display(), "skipping symbolic link");
            continue;
        }
        if file_type.is_dir() {
            subdirs.push(entry.path());
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_artifact(&name) {
            tracing::debug!(path = %entry.path().display(), "deleting OS artifact");
            fs::remove_file(entry.path()).map_err(ErrorKind::Io)?;
            continue;
        }
        let path = entry.path();
        let metadata = entry.metadata().map_err(ErrorKind::Io)?;
        let rel_path = path.strip_prefix(batch_root).unwrap_or(&path).to_path_buf();
        out.push(FileEntry {
            attrs: FileAttrs::from_metadata(&metadata),
            rel_path,
            name,
            path,
        });
    }
    for subdir in subdirs {
        walk_dir(&subdir, batch_root, out)?;
    }
    Ok(())
}

/// Converts a byte count to a human readable denomination.
///
/// Decimal units (1000-based), two decimal places, matching what operators
/// see in departmental file managers.
#[must_use]
pub fn human_size(size: u64) -> String {
    const UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
    if size == 0 {
        return "0B".to_string();
    }
    let exponent = ((size as f64).log(1000.0).floor() as usize).min(UNITS.len() - 1);
    let scaled = size as f64 / 1000f64.powi(exponent as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{}{}", rounded, UNITS[exponent])
}
