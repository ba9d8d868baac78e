//! Per-object inventory manifests.
//!
//! A manifest is written in one pass to a temporary file in the same
//! directory as its final location, then moved into place with a single
//! atomic rename. Either the finished manifest appears under the final
//! name or nothing does — an interrupted inventory never leaves a
//! truncated `manifest.csv` behind.

use crate::error::{ErrorKind, Result};
use crate::stamp;
use arca_digest::Digest;
use arca_object::{FileEntry, human_size};
use exn::OptionExt;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use time::OffsetDateTime;

/// One manifest row: a file inside an object at inventory time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Row number, following traversal order
    pub sequence: u64,
    pub filename: String,
    /// Human-readable size
    pub size: String,
    /// MIME-type guess from the file extension
    pub filetype: String,
    pub changed: String,
    pub modified: String,
    pub accessed: String,
    pub fast_sum: String,
    pub strong_sum: String,
    /// When the checksums were computed
    pub summed_at: String,
    /// Path relative to the batch root
    pub rel_path: String,
    pub mode: u32,
    pub inode: u64,
    pub device: u64,
    pub links: u64,
    pub uid: u32,
    pub gid: u32,
}

fn render_time(at: Option<OffsetDateTime>) -> String {
    at.map(stamp::ledger).unwrap_or_default()
}

impl ManifestEntry {
    /// Build a row from a walked file and its freshly computed checksums.
    pub fn new(sequence: u64, file: &FileEntry, fast_sum: impl Into<String>, strong_sum: impl Into<String>) -> Self {
        let filetype = mime_guess::from_path(&file.path)
            .first_raw()
            .map(str::to_string)
            // What the previous generation of manifests recorded for
            // unguessable types, kept so columns diff cleanly.
            .unwrap_or_else(|| "None".to_string());
        Self {
            sequence,
            filename: file.name.clone(),
            size: human_size(file.attrs.size),
            filetype,
            changed: render_time(file.attrs.changed),
            modified: render_time(file.attrs.modified),
            accessed: render_time(file.attrs.accessed),
            fast_sum: fast_sum.into(),
            strong_sum: strong_sum.into(),
            summed_at: stamp::ledger(stamp::now()),
            rel_path: file.rel_path.display().to_string(),
            mode: file.attrs.mode,
            inode: file.attrs.inode,
            device: file.attrs.device,
            links: file.attrs.links,
            uid: file.attrs.uid,
            gid: file.attrs.gid,
        }
    }
}

/// Writes a complete manifest, atomically.
///
/// All rows land in a [`NamedTempFile`] beside the destination;
/// [`finish`](Self::finish) appends the trailing comment row and persists
/// the temporary file into place as the one and only visible write.
pub struct ManifestWriter {
    writer: csv::Writer<NamedTempFile>,
    destination: PathBuf,
    rows: u64,
}

impl ManifestWriter {
    /// Stage a new manifest destined for `destination`, writing the
    /// 18-column header. The digest columns are titled after the two
    /// configured algorithms.
    pub fn create(destination: impl Into<PathBuf>, fast: Digest, strong: Digest) -> Result<Self> {
        let destination = destination.into();
        let dir = destination
            .parent()
            .ok_or_raise(|| ErrorKind::Io(io::Error::other("manifest destination has no parent")))?;
        // Same directory as the destination so the final persist is a
        // rename, not a copy across filesystems.
        let tmp = NamedTempFile::new_in(dir).map_err(ErrorKind::Io)?;
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(tmp);
        writer
            .write_record([
                "No.",
                "Filename",
                "Filesize",
                "Filetype",
                "C-Time",
                "Modified",
                "Accessed",
                fast.title(),
                strong.title(),
                "ChecksumDateTime",
                "RelPath",
                "=>",
                "mode",
                "inode",
                "device",
                "nlink",
                "uid",
                "gid",
            ])
            .map_err(ErrorKind::Csv)?;
        Ok(Self { writer, destination, rows: 0 })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Append one row.
    pub fn push(&mut self, entry: &ManifestEntry) -> Result<()> {
        self.writer
            .write_record([
                entry.sequence.to_string(),
                entry.filename.clone(),
                entry.size.clone(),
                entry.filetype.clone(),
                entry.changed.clone(),
                entry.modified.clone(),
                entry.accessed.clone(),
                entry.fast_sum.clone(),
                entry.strong_sum.clone(),
                entry.summed_at.clone(),
                entry.rel_path.clone(),
                "=>".to_string(),
                entry.mode.to_string(),
                entry.inode.to_string(),
                entry.device.to_string(),
                entry.links.to_string(),
                entry.uid.to_string(),
                entry.gid.to_string(),
            ])
            .map_err(ErrorKind::Csv)?;
        self.rows += 1;
        Ok(())
    }

    /// Write the trailing free-text comment row, then atomically move the
    /// staged file into place. Returns the number of data rows written.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.write_record(["Comments", ""]).map_err(ErrorKind::Csv)?;
        self.writer.flush().map_err(ErrorKind::Io)?;
        let tmp = self
            .writer
            .into_inner()
            .map_err(|err| ErrorKind::Io(io::Error::other(err.error().to_string())))?;
        tmp.persist(&self.destination).map_err(|err| ErrorKind::Io(err.error))?;
        tracing::debug!(path = %self.destination.display(), rows = self.rows, "manifest written");
        Ok(self.rows)
    }
}
