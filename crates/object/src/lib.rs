//! Digital object model and filesystem primitives.
//!
//! An [`Object`] is a directory under a batch root representing one
//! preservation unit. Objects are mutated in place by every pipeline stage
//! and never deleted; their processing state is read straight from disk
//! (presence of a metadata record, a manifest, a packaged payload) rather
//! than cached, so re-running a batch always sees the truth.

pub mod error;
mod name;
mod walk;

pub use crate::name::validate as validate_name;
pub use crate::walk::{FileAttrs, FileEntry, human_size, is_artifact, walk};

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// Well-known file and directory names inside an object.
pub mod names {
    /// The per-object metadata record.
    pub const RECORD: &str = "metadata.csv";
    /// The secondary (RDF/XML) rendering of the record.
    pub const RENDERING: &str = "metadata.xml";
    /// The per-object inventory manifest.
    pub const MANIFEST: &str = "manifest.csv";
    /// The per-batch registration audit log, at the batch root.
    pub const AUDIT_LOG: &str = "log4preservation.csv";
    /// The payload directory a fixity-packaged object keeps its content in.
    pub const PAYLOAD_DIR: &str = "data";
    /// The packaging declaration file.
    pub const DECLARATION: &str = "bagit.txt";
    /// Files whose name contains this substring survive pre-pack pruning.
    pub const META_MARKER: &str = "meta";
}

/// One preservation unit: a directory under a batch root.
///
/// Holds only the path; every state question goes to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    path: PathBuf,
    name: String,
}

impl Object {
    /// Wrap an existing directory as an object.
    ///
    /// # Errors
    /// [`ErrorKind::NotFound`] if the path does not exist,
    /// [`ErrorKind::NotADirectory`] if it is not a directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            exn::bail!(ErrorKind::NotFound(path));
        }
        if !path.is_dir() {
            exn::bail!(ErrorKind::NotADirectory(path));
        }
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory's base name: the local identifier before registration,
    /// the system identifier after.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_path(&self) -> PathBuf {
        self.path.join(names::RECORD)
    }

    pub fn rendering_path(&self) -> PathBuf {
        self.path.join(names::RENDERING)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(names::MANIFEST)
    }

    pub fn has_record(&self) -> bool {
        self.record_path().exists()
    }

    pub fn has_manifest(&self) -> bool {
        self.manifest_path().exists()
    }

    /// Whether the object already conforms to the payload/tag-manifest
    /// packaging convention. The payload directory is the marker the
    /// original departmental workflows key off, so it is the one we check.
    pub fn looks_packaged(&self) -> bool {
        self.path.join(names::PAYLOAD_DIR).is_dir()
    }
}

/// List the immediate subdirectories of `dir` as objects, in stable
/// (lexical) order. Non-directory entries are not returned.
pub fn objects_in(dir: impl AsRef<Path>) -> Result<Vec<Object>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        exn::bail!(ErrorKind::NotADirectory(dir.to_path_buf()));
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(ErrorKind::Io)?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(ErrorKind::Io)?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    paths.sort();
    paths.into_iter().map(Object::open).collect()
}

/// Resolve an object directory under a batch root from a ledger-supplied
/// name, refusing names that could address outside the root.
pub fn resolve(batch_root: impl AsRef<Path>, name: &str) -> Result<PathBuf> {
    let name = validate_name(name).or_raise(|| ErrorKind::InvalidName(name.to_string()))?;
    Ok(batch_root.as_ref().join(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_rejects_missing_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(&*Object::open(&missing).unwrap_err(), ErrorKind::NotFound(_)));
        let file = dir.path().join("a-file");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(&*Object::open(&file).unwrap_err(), ErrorKind::NotADirectory(_)));
    }

    #[test]
    fn test_state_markers() {
        let dir = tempfile::tempdir().unwrap();
        let object = Object::open(dir.path()).unwrap();
        assert!(!object.has_record());
        assert!(!object.has_manifest());
        assert!(!object.looks_packaged());
        fs::write(object.record_path(), b"header\n").unwrap();
        fs::create_dir(dir.path().join(names::PAYLOAD_DIR)).unwrap();
        assert!(object.has_record());
        assert!(object.looks_packaged());
        // A stray *file* called `data` is not a payload directory.
        let other = tempfile::tempdir().unwrap();
        fs::write(other.path().join(names::PAYLOAD_DIR), b"x").unwrap();
        assert!(!Object::open(other.path()).unwrap().looks_packaged());
    }

    #[test]
    fn test_objects_in_is_sorted_and_dirs_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zebra")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("loose-file.txt"), b"x").unwrap();
        let objects = objects_in(dir.path()).unwrap();
        let found: Vec<&str> = objects.iter().map(Object::name).collect();
        assert_eq!(found, vec!["alpha", "zebra"]);
    }

    #[test]
    fn test_resolve_refuses_traversal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve(dir.path(), "obj-001").is_ok());
        assert!(resolve(dir.path(), "../escape").is_err());
        assert!(resolve(dir.path(), "a/b").is_err());
    }
}
