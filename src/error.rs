use std::path::PathBuf;

use anyhow::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input CSV not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read input CSV {}: {cause:#}", .path.display())]
    Read { path: PathBuf, cause: Error },
    #[error("failed to write {}: {cause:#}", .path.display())]
    Write { path: PathBuf, cause: Error },
    #[error(transparent)]
    Other(#[from] Error),
}

impl AppError {
    pub fn write(path: impl Into<PathBuf>, cause: Error) -> Self {
        AppError::Write {
            path: path.into(),
            cause,
        }
    }
}
