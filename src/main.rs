use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use job_tracker::{
    config::{DEFAULT_FOLLOWUP_DAYS, DEFAULT_STALE_DAYS},
    logging::{build_subscriber, DEFAULT_LOG_FILE},
    pipeline, Thresholds, TrackerConfig,
};

/// Clean, flag, and report on your job applications CSV.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to applications CSV (e.g., data/applications.csv)
    #[arg(short, long)]
    input: PathBuf,

    /// Output folder (e.g., outputs)
    #[arg(short, long)]
    output: PathBuf,

    /// Days after applying (or last contact) to flag follow-up due
    #[arg(long, default_value_t = DEFAULT_FOLLOWUP_DAYS, value_parser = clap::value_parser!(u32).range(1..))]
    followup_days: u32,

    /// Days since last contact to flag stale
    #[arg(long, default_value_t = DEFAULT_STALE_DAYS, value_parser = clap::value_parser!(u32).range(1..))]
    stale_days: u32,

    /// Log file, appended to on every run
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors on the console
    #[arg(short, long)]
    quiet: bool,
}

/// Pipeline failures are reported once, through the log; only setup errors
/// fall through to anyhow's printer.
fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let subscriber = build_subscriber(&args.log_file, &args.log_level, args.quiet)?;
    let config = TrackerConfig {
        input: args.input,
        output_dir: args.output,
        thresholds: Thresholds {
            followup_days: args.followup_days,
            stale_days: args.stale_days,
        },
    };

    let code = tracing::subscriber::with_default(subscriber, || match pipeline::run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    });
    Ok(code)
}
