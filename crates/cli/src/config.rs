//! Configuration profile: defaults, `arca.toml`, `ARCA_*` environment
//! variables, and an optional operator-chosen file, merged in that order.
//! Command-line flags override everything here.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Header column holding each object's local identifier.
    pub id_column: Option<String>,
    /// Namespace tag for locally minted identifiers.
    pub namespace: Option<String>,
    /// Fast manifest digest.
    pub fast_digest: Option<String>,
    /// Strong manifest digest (also used for the transfer ledger).
    pub strong_digest: Option<String>,
    /// Algorithms requested from the fixity packager.
    pub packaging_digests: Option<Vec<String>>,
    /// Gzip-compress archives.
    pub gzip: Option<bool>,
}

pub fn load(file: Option<&Path>) -> Result<Profile> {
    let mut figment = Figment::from(Serialized::defaults(Profile::default()))
        .merge(Toml::file("arca.toml"))
        .merge(Env::prefixed("ARCA_"));
    if let Some(file) = file {
        figment = figment.merge(Toml::file(file));
    }
    figment.extract().or_raise(|| ErrorKind::Config)
}
