use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_FOLLOWUP_DAYS: u32 = 10;
pub const DEFAULT_STALE_DAYS: u32 = 21;

pub const CLEANED_CSV_FILE: &str = "cleaned_applications.csv";
pub const SUMMARY_FILE: &str = "summary.md";
pub const DASHBOARD_FILE: &str = "dashboard.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Days without contact (or since applying, if never contacted) before a
    /// follow-up is due.
    pub followup_days: u32,
    /// Days without contact before an application counts as stale.
    pub stale_days: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            followup_days: DEFAULT_FOLLOWUP_DAYS,
            stale_days: DEFAULT_STALE_DAYS,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.followup_days == 0 {
            return Err(AppError::InvalidConfig(
                "followup_days must be a positive integer".into(),
            ));
        }
        if self.stale_days == 0 {
            return Err(AppError::InvalidConfig(
                "stale_days must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub thresholds: Thresholds,
}

impl TrackerConfig {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            thresholds: Thresholds::default(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        self.thresholds.validate()
    }

    pub fn cleaned_csv_path(&self) -> PathBuf {
        self.output_dir.join(CLEANED_CSV_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }

    pub fn dashboard_path(&self) -> PathBuf {
        self.output_dir.join(DASHBOARD_FILE)
    }
}
