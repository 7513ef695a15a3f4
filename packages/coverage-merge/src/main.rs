use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use coverage_merge::{initialize_merge_log, run, MergeOptions, MergeResult};
use tracing::info;

/// Merge unit and component test coverage into one istanbul report.
///
/// Reads `reports/<producer>/coverage-final.json`, writes the merged html
/// report to `coverage/` and prints a coverage table.
#[derive(Debug, Parser)]
#[command(name = "coverage-merge", version)]
struct Cli {
    /// JSON config file. Defaults to `.coverage-merge.json` when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Overrides `log.level` from the config (error, warn, info, debug, trace, off).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> MergeResult<()> {
    let cli = Cli::parse();

    let mut options = MergeOptions::load(cli.config.as_deref(), &PathBuf::from("."))?;
    if let Some(level) = cli.log_level {
        options.log.level = Some(level);
    }

    initialize_merge_log(&options.log);

    let outcome = run(&options)?;
    info!(
        contributed = ?outcome.contributed,
        missing = ?outcome.missing,
        files = outcome.files,
        "coverage merge complete"
    );

    Ok(())
}
