//! Error types for ingestion and processing.

use std::path::PathBuf;

/// Failures while reading a tracker CSV into the datasets.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The path is missing, is not a regular file, or cannot be opened.
    #[error("CSV file not found or unreadable: {}", .0.display())]
    NotFound(PathBuf),

    /// A row that passed the confidence filter lacks a required column.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures of the full ingest → smooth → extract pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("smoothing needs at least {required} samples, only {available} accepted")]
    InsufficientSamples { required: usize, available: usize },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`ProcessError`].
pub type ProcessResult<T> = Result<T, ProcessError>;

impl ProcessError {
    pub fn invalid_parameters(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
}
