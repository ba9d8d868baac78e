//! The batch-level master ledger.

use crate::error::{ErrorKind, Result};
use crate::record::{MetadataRecord, validate_header};
use std::path::{Path, PathBuf};

/// The master ledger: one data row per object in the batch, keyed by an
/// operator-chosen local-identifier column.
///
/// Opening the ledger validates everything up front — extension, header,
/// every row — so a malformed ledger aborts the metadata stage before a
/// single record lands on disk (no partial processing).
#[derive(Debug)]
pub struct MasterLedger {
    path: PathBuf,
    rows: Vec<MetadataRecord>,
}

impl MasterLedger {
    /// Open and fully validate a master ledger.
    ///
    /// # Errors
    /// [`ErrorKind::NotCsv`] for a non-CSV path,
    /// [`ErrorKind::HeaderMismatch`] when the header row is not exactly the
    /// required field list, [`ErrorKind::Csv`] for malformed rows.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            exn::bail!(ErrorKind::NotCsv(path.to_path_buf()));
        }
        let mut reader = csv::Reader::from_path(path).map_err(ErrorKind::Csv)?;
        validate_header(reader.headers().map_err(ErrorKind::Csv)?)?;
        let rows = reader
            .deserialize()
            .collect::<csv::Result<Vec<MetadataRecord>>>()
            .map_err(ErrorKind::Csv)?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "master ledger validated");
        Ok(Self { path: path.to_path_buf(), rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows in file order.
    pub fn rows(&self) -> &[MetadataRecord] {
        &self.rows
    }

    /// The local identifier of a row, taken from the operator-chosen column.
    pub fn local_id_of<'a>(&self, row: &'a MetadataRecord, id_column: &str) -> Result<&'a str> {
        row.field(id_column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::REQUIRED_HEADER;

    fn write_ledger(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut contents = format!("{header}\n");
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_open_valid_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger(
            dir.path(),
            "master.csv",
            &REQUIRED_HEADER.join(","),
            &[
                ",obj-001,Special Collections,limen,Baxter,desc one,https://x/1,https://x/c",
                ",obj-002,Special Collections,limen,Baxter,desc two,https://x/2,https://x/c",
            ],
        );
        let ledger = MasterLedger::open(&path).unwrap();
        assert_eq!(ledger.rows().len(), 2);
        assert_eq!(ledger.local_id_of(&ledger.rows()[1], "Local ID").unwrap(), "obj-002");
    }

    #[test]
    fn test_open_rejects_non_csv_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.xlsx");
        std::fs::write(&path, b"whatever").unwrap();
        assert!(matches!(&*MasterLedger::open(&path).unwrap_err(), ErrorKind::NotCsv(_)));
    }

    #[test]
    fn test_open_rejects_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        // Drop the last required column.
        let header = REQUIRED_HEADER[..7].join(",");
        let path = write_ledger(dir.path(), "master.csv", &header, &[]);
        let err = MasterLedger::open(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::HeaderMismatch(_)));
    }

    #[test]
    fn test_open_rejects_reordered_header() {
        let dir = tempfile::tempdir().unwrap();
        let mut reordered: Vec<&str> = REQUIRED_HEADER.to_vec();
        reordered.swap(0, 1);
        let path = write_ledger(dir.path(), "master.csv", &reordered.join(","), &[]);
        assert!(matches!(&*MasterLedger::open(&path).unwrap_err(), ErrorKind::HeaderMismatch(_)));
    }

    #[test]
    fn test_unknown_id_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ledger(
            dir.path(),
            "master.csv",
            &REQUIRED_HEADER.join(","),
            &[",obj-001,dept,person,coll,desc,https://x/1,https://x/c"],
        );
        let ledger = MasterLedger::open(&path).unwrap();
        let err = ledger.local_id_of(&ledger.rows()[0], "Accession No.").unwrap_err();
        assert!(matches!(&*err, ErrorKind::MissingColumn(_)));
    }
}
