//! Error types for DataHub ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by object storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The object does not exist.
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The key cannot be mapped to a storage location.
    #[error("invalid object key '{key}'")]
    InvalidKey { key: String },

    /// Backend I/O failure.
    #[error("storage i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// Errors that can occur while decoding ingested data.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Storage Errors ===
    #[error(transparent)]
    Storage(#[from] StorageError),

    // === CSV Parsing Errors ===
    /// Malformed CSV content.
    #[error("failed to parse CSV at line {line}: {message}")]
    CsvParse { line: u64, message: String },

    /// A data row has more cells than the header.
    #[error("line {line} has {found} fields, header has {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    // === Event Errors ===
    /// The trigger event does not carry the required keys.
    #[error("malformed trigger event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line = err
            .position()
            .map(csv::Position::line)
            .unwrap_or_default();
        Self::CsvParse {
            line,
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::NotFound {
            bucket: "partners".to_string(),
            key: "test/degree/enrollments/terms_20200130.csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "object not found: partners/test/degree/enrollments/terms_20200130.csv"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let ingest_err: IngestError = serde_err.into();
        assert!(matches!(ingest_err, IngestError::MalformedEvent(_)));
    }
}
