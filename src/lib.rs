//! Cleans a job applications CSV, flags rows that need attention, and writes
//! a cleaned CSV, a markdown summary, and a JSON dashboard.

pub mod cleaning;
pub mod config;
pub mod dates;
pub mod error;
pub mod flags;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod project_io;
pub mod reporting;
pub mod value_utils;

pub use config::{Thresholds, TrackerConfig};
pub use error::AppError;
pub use pipeline::{run, run_at, RunOutputs};
