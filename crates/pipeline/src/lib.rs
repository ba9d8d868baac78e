//! The packaging pipeline: an ordered sequence of idempotent, skip-aware,
//! filesystem-transforming stages over a tree of object directories.
//!
//! The [`Pipeline`] runs its enabled [`Stage`]s strictly sequentially —
//! one stage to completion across the whole batch before the next begins,
//! objects one at a time in listing order. Every stage re-derives the
//! state it needs from disk, so re-running a batch is safe: already
//! processed objects are recognised and skipped rather than re-processed,
//! and nothing is ever rolled back.
//!
//! Operator interaction is entirely behind the [`Confirm`] seam; the
//! pipeline itself never touches a terminal.

pub mod confirm;
pub mod error;
pub mod report;
mod runner;
pub mod stage;

pub use crate::confirm::{BatchConfirm, Confirm, Decisions, Prompt};
pub use crate::report::{
    ArchiveReport, FixityReport, InventoryReport, MetadataReport, PrepackReport, RegisterReport,
    Summary, TransferReport,
};
pub use crate::runner::{Pipeline, Stage};
