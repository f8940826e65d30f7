use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILE: &str = "logs/job_tracker.log";

/// Builds a subscriber that logs to stderr and appends to `log_file`.
///
/// `RUST_LOG` overrides `level` when set. With `quiet`, the console only
/// shows warnings and errors; the file still gets everything the filter
/// lets through. The caller decides how to install it.
pub fn build_subscriber(
    log_file: &Path,
    level: &str,
    quiet: bool,
) -> Result<impl Subscriber + Send + Sync + 'static> {
    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create log dir {:?}", parent))?;
        }
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("failed to open log file {:?}", log_file))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
    });
    let console_level = if quiet {
        LevelFilter::WARN
    } else {
        LevelFilter::TRACE
    };

    Ok(tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_level),
        )
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_log_file_and_records_events() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_file = dir.path().join("logs").join("job_tracker.log");
        let subscriber = build_subscriber(&log_file, "info", true).expect("subscriber");

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Loading input CSV: test.csv");
        });

        let contents = fs::read_to_string(&log_file).expect("read log");
        assert!(contents.contains("Loading input CSV: test.csv"));
        assert!(contents.contains("INFO"));
    }
}
