//! `arca` — batch packaging of digital objects for preservation.

mod config;
mod error;
mod prompt;

use crate::error::{ErrorKind, Result};
use arca_digest::Digest;
use arca_mint::{DEFAULT_NAMESPACE, RandomAuthority};
use arca_pack::{BagPackager, Compression};
use arca_pipeline::{BatchConfirm, Confirm, Pipeline, Stage, Summary};
use clap::Parser;
use exn::ResultExt;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "arca", version, about = "Converts a folder of digital objects into preservation-ready archival packages")]
struct Args {
    /// The batch root: a folder containing one directory per object
    batch: PathBuf,

    /// Master CSV metadata file (required for the metadata stage)
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Header column holding each object's local identifier
    #[arg(long)]
    id_column: Option<String>,

    /// Stages to run, comma-separated (metadata,register,inventory,fixity,archive,transfer)
    #[arg(long, value_delimiter = ',')]
    stages: Vec<String>,

    /// Pre-package the items first (only for the first run on these items)
    #[arg(long)]
    prepack: bool,

    /// Gzip-compress the tar archives
    #[arg(long)]
    gzip: bool,

    /// Build the transfer ledger over this directory instead of the
    /// archived output
    #[arg(long)]
    transfer_dir: Option<PathBuf>,

    /// Non-interactive: answer every prompt with its batch default
    #[arg(long, short = 'y')]
    yes: bool,

    /// Fast manifest digest (crc32, md5, ...)
    #[arg(long)]
    fast_digest: Option<String>,

    /// Strong manifest digest (sha3-256, sha512, blake3, ...)
    #[arg(long)]
    strong_digest: Option<String>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_stage(name: &str) -> Result<Stage> {
    match name.to_lowercase().as_str() {
        "prepack" | "pre-pack" => Ok(Stage::Prepack),
        "metadata" | "meta" => Ok(Stage::Metadata),
        "register" | "registration" => Ok(Stage::Register),
        "inventory" | "manifest" => Ok(Stage::Inventory),
        "fixity" | "bag" => Ok(Stage::Fixity),
        "archive" | "tar" => Ok(Stage::Archive),
        "transfer" => Ok(Stage::Transfer),
        _ => exn::bail!(ErrorKind::UnknownStage(name.to_string())),
    }
}

fn parse_digest(name: &str) -> Result<Digest> {
    name.parse::<Digest>().or_raise(|| ErrorKind::UnknownDigest(name.to_string()))
}

fn run(args: &Args) -> Result<Summary> {
    let profile = config::load(args.config.as_deref())?;

    let fast = match args.fast_digest.as_deref().or(profile.fast_digest.as_deref()) {
        Some(name) => parse_digest(name)?,
        None => Digest::Md5,
    };
    let strong = match args.strong_digest.as_deref().or(profile.strong_digest.as_deref()) {
        Some(name) => parse_digest(name)?,
        None => Digest::Sha3_256,
    };
    let packaging = match &profile.packaging_digests {
        Some(names) => names.iter().map(|name| parse_digest(name)).collect::<Result<Vec<_>>>()?,
        None => vec![Digest::Md5, Digest::Sha512],
    };

    let mut stages: Vec<Stage> = if args.stages.is_empty() {
        Stage::DEFAULT.to_vec()
    } else {
        args.stages.iter().map(|name| parse_stage(name)).collect::<Result<Vec<_>>>()?
    };
    if args.prepack && !stages.contains(&Stage::Prepack) {
        stages.push(Stage::Prepack);
    }

    let authority =
        RandomAuthority::new(profile.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE));
    let packager = BagPackager;
    let interactive = prompt::InteractiveConfirm;
    let batch_policy = BatchConfirm;
    let confirm: &dyn Confirm = if args.yes { &batch_policy } else { &interactive };
    let gzip = args.gzip || profile.gzip.unwrap_or(false);

    let pipeline = Pipeline {
        batch_root: args.batch.clone(),
        ledger_path: args.ledger.clone(),
        id_column: args
            .id_column
            .clone()
            .or(profile.id_column.clone())
            .unwrap_or_else(|| "Local ID".to_string()),
        fast,
        strong,
        packaging,
        compression: if gzip { Compression::Gzip } else { Compression::None },
        transfer_dir: args.transfer_dir.clone(),
        authority: &authority,
        packager: &packager,
        confirm,
    };
    pipeline.run(&stages).or_raise(|| ErrorKind::Pipeline)
}

fn print_summary(summary: &Summary) {
    if let Some(report) = &summary.prepack {
        println!("pre-pack:  {report}");
    }
    if let Some(report) = &summary.metadata {
        println!("metadata:  {report}");
    }
    if let Some(report) = &summary.register {
        println!("register:  {report}");
    }
    if let Some(report) = &summary.inventory {
        println!("inventory: {report}");
    }
    if let Some(report) = &summary.fixity {
        println!("fixity:    {report}");
    }
    if let Some(report) = &summary.archive {
        println!("archive:   {report}");
    }
    if let Some(report) = &summary.transfer {
        println!("transfer:  {report}");
    }
    if let Some(reason) = &summary.stopped {
        println!("stopped:   {reason}");
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(summary) => {
            print_summary(&summary);
            if summary.aborted {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        },
        Err(err) => {
            tracing::error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("metadata", Stage::Metadata)]
    #[case("META", Stage::Metadata)]
    #[case("registration", Stage::Register)]
    #[case("manifest", Stage::Inventory)]
    #[case("bag", Stage::Fixity)]
    #[case("tar", Stage::Archive)]
    #[case("transfer", Stage::Transfer)]
    fn test_parse_stage(#[case] name: &str, #[case] expected: Stage) {
        assert_eq!(parse_stage(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_stage_invalid() {
        assert!(parse_stage("teleport").is_err());
    }

    #[test]
    fn test_default_stage_selection_keeps_order() {
        let args = Args::parse_from(["arca", "/tmp/batch", "--prepack"]);
        assert!(args.prepack);
        assert!(args.stages.is_empty());
    }

    #[test]
    fn test_stage_list_parses_comma_separated() {
        let args = Args::parse_from(["arca", "/tmp/batch", "--stages", "metadata,register"]);
        let stages: Vec<Stage> =
            args.stages.iter().map(|name| parse_stage(name).unwrap()).collect();
        assert_eq!(stages, vec![Stage::Metadata, Stage::Register]);
    }
}
