//! CLI for normalizing typography across a PPTX deck.
//!
//! On success, the summary record is the only thing written to stdout;
//! logging and error messages go to stderr. Any failure exits with
//! code 1.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use polisher_core::{Error, Mode, ModeController, RuleConfig};
use polisher_pptx::{PackageMode, PptxPackage};
use std::path::PathBuf;
use std::process::ExitCode;

/// Enforce minimum font size and default fill color across a deck.
#[derive(Parser, Debug)]
#[command(name = "pptx-polisher")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input presentation (.pptx)
    #[arg(long)]
    input: PathBuf,

    /// Rules file (JSON); omit to use the default rule set
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Report what would change without mutating the file
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", e);
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            // Missing --input, unknown options, and the like: message on
            // stderr, stdout untouched.
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    if !args.input.exists() {
        return Err(Error::InputNotFound(args.input.display().to_string()).into());
    }

    let config = RuleConfig::load(args.rules.as_deref())?;
    log::debug!("Loaded config: {:?}", config);

    let (mode, package_mode) = if args.dry_run {
        (Mode::Analyze, PackageMode::ReadOnly)
    } else {
        (Mode::Apply, PackageMode::ReadWrite)
    };

    let mut package = PptxPackage::open(&args.input, package_mode)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    let summary = ModeController::new(config, mode).run(&mut package)?;

    println!("{}", summary.to_pretty_json());
    Ok(())
}
