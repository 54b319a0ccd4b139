pub mod config;
pub mod data_type;
pub mod enums;
pub mod error;
pub mod identity;
pub mod log_record;
pub mod metadata;
pub mod outcome;

pub use config::{
    DatahubConfig, DedupStrategy, EXCLUDED_FILES, EmailSettings, LogSettings, MetadataSettings,
    RECOGNIZED_FILES, StorageSettings, ValidationSettings,
};
pub use data_type::{DataType, FieldPattern, is_blank};
pub use enums::{ErrorCode, FolderKind, Priority};
pub use error::{ModelError, Result};
pub use identity::{FileIdentity, SchemaKey};
pub use log_record::{LOG_COLUMNS, LOG_TIMESTAMP_FORMAT, LogRecord};
pub use metadata::{FieldRule, FileSwap, MetadataRow, PartnerSchedule};
pub use outcome::{
    DuplicateKey, FieldExceptions, FileValidation, MissingFiles, PkViolations,
    ValidationFailure, ValidationOutcome,
};
