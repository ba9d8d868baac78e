//! Tabular artifacts: the master ledger, per-object metadata records, the
//! registration audit log, inventory manifests and transfer ledgers.
//!
//! Everything in this crate is CSV on disk, and disk is the single source
//! of truth — nothing here caches content between stage invocations. The
//! crate enforces the two contracts the rest of the pipeline leans on:
//!
//! - **Header discipline**: a master ledger whose header row is not
//!   *exactly* the required field list is rejected wholesale before any
//!   record is written.
//! - **Atomic manifests**: a manifest is staged in a temporary file and
//!   moved into place in one rename, so a half-written manifest is never
//!   visible under the final name.

mod audit;
pub mod error;
mod manifest;
mod master;
mod record;
mod render;
pub mod stamp;
mod transfer;

pub use crate::audit::{AUDIT_HEADER, AuditEntry, AuditLog};
pub use crate::manifest::{ManifestEntry, ManifestWriter};
pub use crate::master::MasterLedger;
pub use crate::record::{MetadataRecord, REQUIRED_HEADER};
pub use crate::render::Renderer;
pub use crate::transfer::TransferLedger;
