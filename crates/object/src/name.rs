//! Object name validation.
//!
//! Object directories are addressed by names taken from ledger rows. A
//! malformed or hostile row must not be able to address anything outside
//! the batch root, so names are restricted to a single normal path
//! component before they are ever joined to a root.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path};

/// Validates a ledger-supplied object name.
///
/// Accepts exactly one normal path component: no separators, no `.`/`..`,
/// no root or drive prefixes, no NUL bytes, not empty.
///
/// # Returns
/// The name unchanged if valid, or [`InvalidName`](ErrorKind::InvalidName).
pub fn validate(name: &str) -> Result<&str> {
    // Use Rust's built-in path component parser for robust handling rather
    // than scanning for separator characters ourselves.
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(s)), None) if s == std::ffi::OsStr::new(name) => {
            // NUL survives Path::components() on Unix but truncates in
            // C-based syscalls, so reject it here.
            if name.as_bytes().contains(&0) {
                exn::bail!(ErrorKind::InvalidName(name.to_string()));
            }
            Ok(name)
        },
        _ => exn::bail!(ErrorKind::InvalidName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("obj-001")]
    #[case("Acc2019_Baxter")]
    #[case("vtdata_0a1b2c3d")]
    #[case("name with spaces")]
    fn test_valid_names(#[case] name: &str) {
        assert_eq!(validate(name).unwrap(), name);
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("a/b")]
    #[case("../escape")]
    #[case("/absolute")]
    #[case("trailing/")]
    #[case("nul\0byte")]
    fn test_invalid_names(#[case] name: &str) {
        assert!(matches!(&*validate(name).unwrap_err(), ErrorKind::InvalidName(_)));
    }
}
