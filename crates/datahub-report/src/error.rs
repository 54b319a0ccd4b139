//! Error types for log persistence and notifications.

use std::path::PathBuf;

use datahub_ingest::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An existing log file could not be read back.
    #[error("failed to read log {path}: {source}")]
    ReadLog {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("outbox i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ReportError>;
