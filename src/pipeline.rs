use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::{
    cleaning::{clean_applications_at, missing_columns},
    config::TrackerConfig,
    error::AppError,
    flags::add_flags_at,
    project_io::{read_applications_csv, write_cleaned_csv, write_dashboard_json, write_summary_md},
    reporting::{build_dashboard, render_summary_md, Dashboard},
};

#[derive(Debug, Clone)]
pub struct RunOutputs {
    pub cleaned_csv: PathBuf,
    pub summary_md: PathBuf,
    pub dashboard_json: PathBuf,
    pub dashboard: Dashboard,
}

/// Runs read → normalize → flag → write, measuring ages from today.
pub fn run(config: &TrackerConfig) -> Result<RunOutputs, AppError> {
    run_at(config, Local::now().date_naive())
}

/// Same as [`run`] with an explicit "today". The same date completes partial
/// input dates and anchors every day count.
pub fn run_at(config: &TrackerConfig, today: NaiveDate) -> Result<RunOutputs, AppError> {
    config.validate()?;
    if !config.input.exists() {
        return Err(AppError::InputNotFound(config.input.clone()));
    }

    info!("Loading input CSV: {}", config.input.display());
    let raw = read_applications_csv(&config.input).map_err(|cause| AppError::Read {
        path: config.input.clone(),
        cause,
    })?;
    debug!(
        rows = raw.rows.len(),
        columns = raw.headers.len(),
        "input loaded"
    );
    let synthesized = missing_columns(&raw.headers);
    if !synthesized.is_empty() {
        debug!("synthesizing missing columns: {}", synthesized.join(", "));
    }

    info!("Cleaning/standardizing fields...");
    let cleaned = clean_applications_at(&raw, today);

    info!("Applying rules & flags...");
    let flagged = add_flags_at(cleaned, config.thresholds, today);

    fs::create_dir_all(&config.output_dir).map_err(|err| {
        AppError::write(
            &config.output_dir,
            anyhow::Error::new(err).context("failed to create output dir"),
        )
    })?;

    let cleaned_csv = config.cleaned_csv_path();
    info!("Saving cleaned CSV: {}", cleaned_csv.display());
    write_cleaned_csv(&cleaned_csv, &flagged).map_err(|cause| AppError::write(&cleaned_csv, cause))?;

    let summary_md = config.summary_path();
    info!("Writing summary report: {}", summary_md.display());
    let summary = render_summary_md(&flagged, config.thresholds);
    write_summary_md(&summary_md, &summary).map_err(|cause| AppError::write(&summary_md, cause))?;

    let dashboard_json = config.dashboard_path();
    info!("Writing dashboard JSON: {}", dashboard_json.display());
    let dashboard = build_dashboard(&flagged);
    write_dashboard_json(&dashboard_json, &dashboard)
        .map_err(|cause| AppError::write(&dashboard_json, cause))?;

    let resolved = fs::canonicalize(&config.output_dir).unwrap_or_else(|_| config.output_dir.clone());
    info!("Done. Outputs saved to: {}", resolved.display());

    Ok(RunOutputs {
        cleaned_csv,
        summary_md,
        dashboard_json,
        dashboard,
    })
}
