//! Payload/tag-manifest packaging.
//!
//! [`BagPackager`] conforms an object directory to the BagIt-style
//! convention the downstream repository ingests: the object's entire
//! contents move into a `data/` payload directory, a declaration and
//! bag-info file are written beside it, and one `manifest-<alg>.txt` per
//! requested algorithm lists the checksum of every payload file (tag files
//! get their own `tagmanifest-<alg>.txt`).
//!
//! The pipeline only ever talks to the [`Packager`] trait and the
//! resulting [`Package`]'s validity predicate, so swapping in a different
//! packaging library later means implementing one trait.

use crate::error::{ErrorKind, Result};
use arca_digest::{Digest, sums};
use arca_object::{names, walk};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use time::macros::format_description;

const BAG_DECLARATION: &str = "BagIt-Version: 0.97\nTag-File-Character-Encoding: UTF-8\n";
const BAG_INFO: &str = "bag-info.txt";

/// Conforms a directory to the packaging convention.
pub trait Packager {
    /// Package `path` in place, producing payload manifests for every
    /// requested algorithm.
    fn pack(&self, path: &Path, algorithms: &[Digest]) -> Result<Package>;
}

/// The built-in filesystem packager.
#[derive(Debug, Clone, Copy, Default)]
pub struct BagPackager;

/// A packaged object: payload directory plus manifests on disk.
///
/// Holds only the root path and the algorithm list; every question about
/// validity is answered from disk at call time.
#[derive(Debug, Clone)]
pub struct Package {
    root: PathBuf,
    algorithms: Vec<Digest>,
}

/// The manifest file name for an algorithm (`manifest-sha512.txt`).
fn manifest_name(algorithm: Digest) -> String {
    format!("manifest-{}.txt", algorithm.as_str().replace('-', ""))
}

fn tagmanifest_name(algorithm: Digest) -> String {
    format!("tagmanifest-{}.txt", algorithm.as_str().replace('-', ""))
}

/// Render a relative path with forward slashes, as manifests require.
fn slash_path(path: &Path) -> String {
    path.iter().map(|c| c.to_string_lossy()).collect::<Vec<_>>().join("/")
}

impl Packager for BagPackager {
    fn pack(&self, path: &Path, algorithms: &[Digest]) -> Result<Package> {
        if !path.is_dir() {
            exn::bail!(ErrorKind::NotADirectory(path.to_path_buf()));
        }
        tracing::info!(path = %path.display(), "packaging object");

        // Move the object's entire contents into the payload directory via
        // a staging directory, so a pre-existing entry named `data` simply
        // becomes part of the new payload.
        let staging = tempfile::tempdir_in(path).map_err(ErrorKind::Io)?.keep();
        // Snapshot the listing before moving anything; mutating a directory
        // mid-iteration can make read_dir skip entries.
        let entries: Vec<_> = fs::read_dir(path)
            .map_err(ErrorKind::Io)?
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(ErrorKind::Io)?;
        for entry in entries {
            if entry.path() == staging {
                continue;
            }
            fs::rename(entry.path(), staging.join(entry.file_name())).map_err(ErrorKind::Io)?;
        }
        let payload = path.join(names::PAYLOAD_DIR);
        fs::rename(&staging, &payload).map_err(ErrorKind::Io)?;

        // One walk, every algorithm per file in a single read pass.
        let files = walk(&payload, path).or_raise(|| ErrorKind::Walk)?;
        let mut total_bytes = 0u64;
        let mut listings: Vec<Vec<(String, String)>> = vec![Vec::new(); algorithms.len()];
        for file in &files {
            let file_sums = sums(&file.path, algorithms).or_raise(|| ErrorKind::Checksum)?;
            total_bytes += file.attrs.size;
            for (listing, sum) in listings.iter_mut().zip(file_sums) {
                listing.push((sum, slash_path(&file.rel_path)));
            }
        }
        for (algorithm, listing) in algorithms.iter().zip(&listings) {
            write_manifest(&path.join(manifest_name(*algorithm)), listing)?;
        }

        fs::write(path.join(names::DECLARATION), BAG_DECLARATION).map_err(ErrorKind::Io)?;
        let date = time::OffsetDateTime::now_utc()
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_default();
        fs::write(
            path.join(BAG_INFO),
            format!("Bagging-Date: {date}\nPayload-Oxum: {total_bytes}.{}\n", files.len()),
        )
        .map_err(ErrorKind::Io)?;

        // Tag manifests cover the declaration, bag-info and every payload
        // manifest (never the tag manifests themselves).
        let mut tag_files = vec![names::DECLARATION.to_string(), BAG_INFO.to_string()];
        tag_files.extend(algorithms.iter().map(|a| manifest_name(*a)));
        for algorithm in algorithms {
            let mut listing = Vec::new();
            for tag in &tag_files {
                let sum = sums(path.join(tag), &[*algorithm]).or_raise(|| ErrorKind::Checksum)?.remove(0);
                listing.push((sum, tag.clone()));
            }
            write_manifest(&path.join(tagmanifest_name(*algorithm)), &listing)?;
        }

        Ok(Package { root: path.to_path_buf(), algorithms: algorithms.to_vec() })
    }
}

fn write_manifest(path: &Path, listing: &[(String, String)]) -> Result<()> {
    let mut contents = String::new();
    for (sum, rel_path) in listing {
        contents.push_str(sum);
        contents.push_str("  ");
        contents.push_str(rel_path);
        contents.push('\n');
    }
    fs::write(path, contents).map_err(ErrorKind::Io)?;
    Ok(())
}

impl Package {
    /// Wrap an already-packaged directory.
    pub fn open(root: impl Into<PathBuf>, algorithms: impl Into<Vec<Digest>>) -> Result<Self> {
        let root = root.into();
        if !root.join(names::DECLARATION).exists() {
            exn::bail!(ErrorKind::MissingPackageFile(root.join(names::DECLARATION)));
        }
        Ok(Self { root, algorithms: algorithms.into() })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The validity predicate the pipeline reports on.
    ///
    /// `true` when every payload manifest verifies and the payload is
    /// complete. Problems (including being unable to verify at all) are
    /// logged, not raised — an invalid package flags the object, it does
    /// not kill the batch.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match self.problems() {
            Ok(problems) => {
                for problem in &problems {
                    tracing::warn!(root = %self.root.display(), problem, "package validation problem");
                }
                problems.is_empty()
            },
            Err(err) => {
                tracing::warn!(root = %self.root.display(), error = %err, "package could not be verified");
                false
            },
        }
    }

    /// Every discrepancy between the manifests and the payload on disk.
    pub fn problems(&self) -> Result<Vec<String>> {
        let mut problems = Vec::new();
        let payload = self.root.join(names::PAYLOAD_DIR);
        if !payload.is_dir() {
            problems.push("payload directory is missing".to_string());
            return Ok(problems);
        }
        let mut listed: Vec<String> = Vec::new();
        for algorithm in &self.algorithms {
            let manifest = self.root.join(manifest_name(*algorithm));
            if !manifest.exists() {
                problems.push(format!("{} is missing", manifest_name(*algorithm)));
                continue;
            }
            for (sum, rel_path) in parse_manifest(&manifest)? {
                let file = self.root.join(&rel_path);
                if !file.is_file() {
                    problems.push(format!("{rel_path} is listed but missing"));
                    continue;
                }
                let actual = sums(&file, &[*algorithm]).or_raise(|| ErrorKind::Checksum)?.remove(0);
                if actual != sum {
                    problems.push(format!("{rel_path} fails its {} check", algorithm.as_str()));
                }
                listed.push(rel_path);
            }
        }
        // Completeness: every payload file must be accounted for.
        for file in collect_files(&payload, &self.root)? {
            let rel_path = slash_path(&file);
            if !listed.contains(&rel_path) {
                problems.push(format!("{rel_path} is on disk but not listed"));
            }
        }
        Ok(problems)
    }
}

fn parse_manifest(path: &Path) -> Result<Vec<(String, String)>> {
    let contents = fs::read_to_string(path).map_err(ErrorKind::Io)?;
    let mut entries = Vec::new();
    for line in contents.lines().filter(|line| !line.trim().is_empty()) {
        let (sum, rel_path) = match line.split_once(' ') {
            Some(split) => split,
            None => exn::bail!(ErrorKind::MalformedManifest(path.to_path_buf())),
        };
        entries.push((sum.to_string(), rel_path.trim_start().to_string()));
    }
    Ok(entries)
}

/// Non-mutating file enumeration for verification (unlike the pipeline
/// walker, validation must not delete anything).
fn collect_files(dir: &Path, base: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut listing: Vec<PathBuf> =
        fs::read_dir(dir).map_err(ErrorKind::Io)?.map(|e| e.map(|e| e.path())).collect::<std::io::Result<_>>().map_err(ErrorKind::Io)?;
    listing.sort();
    for path in listing {
        if path.is_dir() {
            files.extend(collect_files(&path, base)?);
        } else {
            files.push(path.strip_prefix(base).unwrap_or(&path).to_path_buf());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALGORITHMS: [Digest; 2] = [Digest::Md5, Digest::Sha512];

    fn packed_object(dir: &Path) -> Package {
        let object = dir.join("obj-001");
        fs::create_dir_all(object.join("images")).unwrap();
        fs::write(object.join("notes.txt"), b"field notes").unwrap();
        fs::write(object.join("images/plate.tif"), b"not really a tiff").unwrap();
        fs::write(object.join("metadata.csv"), b"header\nrow\n").unwrap();
        BagPackager.pack(&object, &ALGORITHMS).unwrap()
    }

    #[test]
    fn test_pack_layout() {
        let dir = tempfile::tempdir().unwrap();
        let package = packed_object(dir.path());
        let root = package.root();
        assert!(root.join("bagit.txt").exists());
        assert!(root.join("bag-info.txt").exists());
        assert!(root.join("manifest-md5.txt").exists());
        assert!(root.join("manifest-sha512.txt").exists());
        assert!(root.join("tagmanifest-md5.txt").exists());
        // The whole original contents moved into the payload.
        assert!(root.join("data/notes.txt").exists());
        assert!(root.join("data/images/plate.tif").exists());
        assert!(root.join("data/metadata.csv").exists());
        assert!(!root.join("notes.txt").exists());

        let manifest = fs::read_to_string(root.join("manifest-md5.txt")).unwrap();
        assert_eq!(manifest.lines().count(), 3);
        assert!(manifest.contains("  data/images/plate.tif"));

        let info = fs::read_to_string(root.join("bag-info.txt")).unwrap();
        assert!(info.contains("Payload-Oxum: 39.3"));
    }

    #[test]
    fn test_fresh_package_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(packed_object(dir.path()).is_valid());
    }

    #[test]
    fn test_corrupted_payload_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let package = packed_object(dir.path());
        fs::write(package.root().join("data/notes.txt"), b"tampered").unwrap();
        assert!(!package.is_valid());
    }

    #[test]
    fn test_missing_payload_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let package = packed_object(dir.path());
        fs::remove_file(package.root().join("data/notes.txt")).unwrap();
        assert!(!package.is_valid());
    }

    #[test]
    fn test_unlisted_payload_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let package = packed_object(dir.path());
        fs::write(package.root().join("data/stowaway.txt"), b"?").unwrap();
        assert!(!package.is_valid());
    }

    #[test]
    fn test_open_requires_declaration() {
        let dir = tempfile::tempdir().unwrap();
        let err = Package::open(dir.path(), ALGORITHMS).unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingPackageFile(_)));
    }

    #[test]
    fn test_pack_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("loose.txt");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(&*BagPackager.pack(&file, &ALGORITHMS).unwrap_err(), ErrorKind::NotADirectory(_)));
    }
}
