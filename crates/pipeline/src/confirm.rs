//! The injected confirmation strategy.
//!
//! Every operator decision point the stages can hit is an explicit
//! [`Prompt`] variant, answered through the [`Confirm`] trait. The core
//! pipeline never touches a terminal; the front-end decides whether a
//! prompt blocks on a human or resolves from a fixed policy
//! ([`BatchConfirm`]).

/// A yes/no question at a well-defined decision point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// At least one metadata record already exists in this batch.
    /// Overwrite *all* existing records for the remainder of the run?
    /// Asked at most once per batch; the answer is cached in [`Decisions`].
    OverwriteAllRecords,
    /// The object looks packaged already. Skip writing its record?
    SkipPackagedRecord { object: String },
    /// The object looks packaged already. Skip inventorying it?
    SkipPackagedInventory { object: String },
    /// The object looks packaged already. Package it anyway?
    PackageAnyway { object: String },
    /// A stage just finished (summary attached). Run the next one?
    ProceedToNextStage { finished: String },
}

/// Answers prompts and receives notices.
///
/// Implementations: an interactive front-end that blocks on the operator,
/// and [`BatchConfirm`] with fixed defaults. The single-operator,
/// single-batch model makes blocking acceptable.
pub trait Confirm {
    /// Answer a yes/no question.
    fn confirm(&self, prompt: &Prompt) -> bool;
    /// Surface a notice that needs no decision.
    fn acknowledge(&self, note: &str);
}

/// Non-interactive policy: never overwrite, skip anything that looks
/// packaged, always proceed to the next stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchConfirm;

impl Confirm for BatchConfirm {
    fn confirm(&self, prompt: &Prompt) -> bool {
        match prompt {
            Prompt::OverwriteAllRecords => false,
            Prompt::SkipPackagedRecord { .. } | Prompt::SkipPackagedInventory { .. } => true,
            Prompt::PackageAnyway { .. } => false,
            Prompt::ProceedToNextStage { .. } => true,
        }
    }

    fn acknowledge(&self, note: &str) {
        tracing::info!("{note}");
    }
}

/// The per-batch decision cache.
///
/// Run-wide answers live here as explicit state handed to each stage call,
/// not as global flags. Currently one decision qualifies: the
/// first-overwrite question, asked once and applied uniformly afterward.
#[derive(Debug, Clone, Default)]
pub struct Decisions {
    overwrite_all: Option<bool>,
}

impl Decisions {
    /// Whether existing metadata records should be overwritten. The first
    /// call asks; every later call replays the recorded answer without
    /// re-prompting.
    pub fn overwrite_all(&mut self, confirm: &dyn Confirm) -> bool {
        *self.overwrite_all.get_or_insert_with(|| confirm.confirm(&Prompt::OverwriteAllRecords))
    }
}
