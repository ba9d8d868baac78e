//! The per-object metadata record and its fixed field list.

use crate::error::{ErrorKind, Result};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The required header, exactly, in order. A ledger or record whose header
/// differs in any way (missing column, extra column, reordering, renamed
/// field) is rejected before anything is written.
pub const REQUIRED_HEADER: [&str; 8] = [
    "System UUID",
    "Local ID",
    "Department Responsible",
    "Person Responsible",
    "Collection",
    "Brief Description",
    "Object URI",
    "Collection URI",
];

/// One object's descriptive metadata: a single data row under the fixed
/// header, persisted per object as `metadata.csv`.
///
/// The system identifier is updated through [`set_system_id`](Self::set_system_id)
/// — a named-field update — but serialisation keeps it as the first column
/// of the first data row, so the on-disk layout other tools rely on is
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "System UUID")]
    pub system_id: String,
    #[serde(rename = "Local ID")]
    pub local_id: String,
    #[serde(rename = "Department Responsible")]
    pub department: String,
    #[serde(rename = "Person Responsible")]
    pub person: String,
    #[serde(rename = "Collection")]
    pub collection: String,
    #[serde(rename = "Brief Description")]
    pub description: String,
    #[serde(rename = "Object URI")]
    pub object_uri: String,
    #[serde(rename = "Collection URI")]
    pub collection_uri: String,
}

/// Check a header row against [`REQUIRED_HEADER`], order included.
pub(crate) fn validate_header(header: &StringRecord) -> Result<()> {
    if header.len() != REQUIRED_HEADER.len()
        || header.iter().zip(REQUIRED_HEADER).any(|(found, required)| found != required)
    {
        let found = header.iter().collect::<Vec<_>>().join(", ");
        exn::bail!(ErrorKind::HeaderMismatch(found));
    }
    Ok(())
}

impl MetadataRecord {
    /// Read one record from a per-object `metadata.csv`.
    ///
    /// The file's header is validated the same way the master ledger's is;
    /// a record rewritten by hand into a different shape is an error, not
    /// a guess.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path).map_err(ErrorKind::Csv)?;
        validate_header(reader.headers().map_err(ErrorKind::Csv)?)?;
        match reader.deserialize().next() {
            Some(row) => Ok(row.map_err(ErrorKind::Csv)?),
            None => exn::bail!(ErrorKind::EmptyRecord(path.to_path_buf())),
        }
    }

    /// Write the record as header plus one data row, overwriting.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = csv::Writer::from_path(path.as_ref()).map_err(ErrorKind::Csv)?;
        writer.serialize(self).map_err(ErrorKind::Csv)?;
        writer.flush().map_err(ErrorKind::Io)?;
        Ok(())
    }

    /// Assign the system identifier by field name.
    pub fn set_system_id(&mut self, id: impl Into<String>) {
        self.system_id = id.into();
    }

    /// Look a field up by its header column name. Used to resolve the
    /// operator-chosen "column holding the local identifier".
    pub fn field(&self, column: &str) -> Result<&str> {
        match column {
            "System UUID" => Ok(&self.system_id),
            "Local ID" => Ok(&self.local_id),
            "Department Responsible" => Ok(&self.department),
            "Person Responsible" => Ok(&self.person),
            "Collection" => Ok(&self.collection),
            "Brief Description" => Ok(&self.description),
            "Object URI" => Ok(&self.object_uri),
            "Collection URI" => Ok(&self.collection_uri),
            _ => exn::bail!(ErrorKind::MissingColumn(column.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(local_id: &str) -> MetadataRecord {
        MetadataRecord {
            system_id: String::new(),
            local_id: local_id.to_string(),
            department: "Special Collections".to_string(),
            person: "limen".to_string(),
            collection: "Baxter Papers".to_string(),
            description: "Correspondence, 1911-1924".to_string(),
            object_uri: "https://example.edu/objects/baxter-01".to_string(),
            collection_uri: "https://example.edu/collections/baxter".to_string(),
        }
    }

    #[test]
    fn test_roundtrip_preserves_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        sample("obj-001").write(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let mut lines = raw.lines();
        assert_eq!(lines.next().unwrap(), REQUIRED_HEADER.join(","));
        // System identifier is the first column of the first data row.
        assert!(lines.next().unwrap().starts_with(",obj-001,"));

        assert_eq!(MetadataRecord::read(&path).unwrap(), sample("obj-001"));
    }

    #[test]
    fn test_set_system_id_lands_in_first_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        let mut record = sample("obj-001");
        record.set_system_id("vtdata_0000");
        record.write(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.lines().nth(1).unwrap().starts_with("vtdata_0000,obj-001,"));
    }

    #[test]
    fn test_read_rejects_reshaped_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, "Local ID,System UUID\nobj-001,\n").unwrap();
        let err = MetadataRecord::read(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::HeaderMismatch(_)));
    }

    #[test]
    fn test_read_rejects_header_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, format!("{}\n", REQUIRED_HEADER.join(","))).unwrap();
        let err = MetadataRecord::read(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::EmptyRecord(_)));
    }

    #[test]
    fn test_field_lookup() {
        let record = sample("obj-001");
        assert_eq!(record.field("Local ID").unwrap(), "obj-001");
        assert_eq!(record.field("Collection").unwrap(), "Baxter Papers");
        assert!(matches!(&*record.field("Shelf Mark").unwrap_err(), ErrorKind::MissingColumn(_)));
    }
}
