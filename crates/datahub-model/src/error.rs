use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown data type tag '{tag}'")]
    UnknownDataType { tag: String },
    #[error("data type {tag} requires a numeric length, got '{value}'")]
    InvalidLength { tag: String, value: String },
    #[error("malformed mandatory values list '{value}'")]
    InvalidOptions { value: String },
    #[error("unknown folder '{0}'")]
    UnknownFolder(String),
    #[error("invalid pattern for {data_type}: {source}")]
    Pattern {
        data_type: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
