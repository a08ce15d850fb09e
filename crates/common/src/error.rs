//! Error types shared across Shotform crates.

use std::path::PathBuf;

use shotform_pose_model::{SettingsError, StreamError};

/// Top-level error type for Shotform operations.
///
/// Analysis outcomes (insufficient data, degenerate geometry, ...) are not
/// errors; they are reported through `ShotReport`. This type covers the
/// I/O and configuration surface around the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ShotformError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Landmark stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Invalid analysis settings: {0}")]
    Settings(#[from] SettingsError),

    #[error("Pose estimation error: {message}")]
    Estimator { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using ShotformError.
pub type ShotformResult<T> = Result<T, ShotformError>;

impl ShotformError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn estimator(msg: impl Into<String>) -> Self {
        Self::Estimator {
            message: msg.into(),
        }
    }
}
