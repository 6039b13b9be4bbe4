//! # owatch CLI entry point
//!
//! Parses command-line arguments, initializes tracing, and dispatches to the
//! [`RuleValidator`]. Structural verdicts come back as an exit code; every
//! other failure propagates out of `main` and is rendered through the
//! runtime's error path.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ow_cli::validate::RuleValidator;

/// OverWatch Rules Validator.
///
/// Checks a monitoring rules file against the rule schema and rejects
/// duplicate alarm or metric filter names. Intended as a CI/build-pipeline
/// gate: exit code 0 means the rules file is safe to apply downstream.
#[derive(Parser, Debug)]
#[command(name = "owatch", version, about, long_about = None)]
struct Cli {
    /// Path to the rules file, or a bare filename to search for when
    /// --autofind is set.
    #[arg(value_name = "PATH", default_value = ow_cli::DEFAULT_RULES_PATH)]
    rules_path: String,

    /// Resolve PATH by searching the working directory tree for a file with
    /// that name. First match wins; traversal order is not deterministic.
    #[arg(long)]
    autofind: bool,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cwd = std::env::current_dir()?;
    tracing::debug!(root = %cwd.display(), autofind = cli.autofind, "starting validation");

    let validator = RuleValidator::new(cwd, cli.rules_path, cli.autofind);
    let code = validator.run()?;

    Ok(ExitCode::from(code))
}
