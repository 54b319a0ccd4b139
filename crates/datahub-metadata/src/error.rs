use datahub_ingest::IngestError;
use datahub_model::ModelError;
use thiserror::Error;

/// Errors raised while loading the metadata tables.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// A settings table could not be fetched or decoded.
    #[error("failed to read metadata table {key}: {source}")]
    Read {
        key: String,
        #[source]
        source: IngestError,
    },

    /// A required column is absent from a settings table.
    #[error("metadata table {key} is missing required column '{column}'")]
    MissingColumn { key: String, column: String },

    /// A schema row carries a row_id that is not an integer.
    #[error("invalid row_id '{value}' in {key}")]
    InvalidRowId { key: String, value: String },

    /// A swap_files or ignore_files cell that does not follow
    /// `program:a,b;c,d|program2:...`.
    #[error("malformed {column} specification '{spec}' for partner {partner}")]
    MalformedOverride {
        partner: String,
        column: String,
        spec: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
