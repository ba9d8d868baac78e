//! Interactive confirmation on the controlling terminal.
//!
//! Questions go to stderr (stdout carries the run summary), answers come
//! from stdin. Blocking on the operator is fine here: one operator, one
//! batch, one question at a time.

use arca_pipeline::{Confirm, Prompt};
use std::io::{self, BufRead, Write};

/// Blocks on the operator for every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractiveConfirm;

/// The question text and the default answer for an empty reply.
pub(crate) fn describe(prompt: &Prompt) -> (String, bool) {
    match prompt {
        Prompt::OverwriteAllRecords => (
            "At least one 'metadata.csv' already exists. Overwrite ALL of them?".to_string(),
            false,
        ),
        Prompt::SkipPackagedRecord { object } => (
            format!("It appears that '{object}' is already packaged. Skip creating 'metadata.csv' for this item?"),
            true,
        ),
        Prompt::SkipPackagedInventory { object } => {
            (format!("It appears that '{object}' is already packaged. Skip this object?"), true)
        },
        Prompt::PackageAnyway { object } => {
            (format!("It appears that '{object}' is already packaged. Package it anyway?"), false)
        },
        Prompt::ProceedToNextStage { finished } => {
            (format!("{finished}. Proceed with the next action?"), true)
        },
    }
}

pub(crate) fn parse_answer(line: &str, default_yes: bool) -> bool {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => true,
        "n" | "no" => false,
        _ => default_yes,
    }
}

impl Confirm for InteractiveConfirm {
    fn confirm(&self, prompt: &Prompt) -> bool {
        let (question, default_yes) = describe(prompt);
        let hint = if default_yes { "Y/n" } else { "y/N" };
        eprint!("{question} [{hint}] ");
        let _ = io::stderr().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return default_yes;
        }
        parse_answer(&line, default_yes)
    }

    fn acknowledge(&self, note: &str) {
        eprintln!("{note}");
    }
}
