//! The validation pipeline.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. file name (code 1)
//! 2. empty or malformed file (code 3)
//! 3. column structure (code 2)
//! 4. field data types (code 4)
//! 5. primary key uniqueness (code 5)
//!
//! The file is read once, after the name check, and the parsed table is
//! shared by the remaining checks.

use datahub_ingest::{CsvTable, IngestError, ObjectStore, read_csv_table};
use datahub_metadata::Metadata;
use datahub_model::{
    FileIdentity, FileValidation, ValidationFailure, ValidationOutcome, ValidationSettings,
};

use crate::checks::{self, CheckResult};

/// Run every check against one file.
///
/// `load` is called at most once, and only when the name check passes. A
/// storage error yields [`ValidationOutcome::Unreadable`]; content that does
/// not parse as CSV fails with [`ValidationFailure::MalformedContent`].
pub fn validate<F>(
    identity: &FileIdentity,
    metadata: &Metadata,
    settings: &ValidationSettings,
    load: F,
) -> FileValidation
where
    F: FnOnce() -> Result<CsvTable, IngestError>,
{
    let scoped = metadata.scoped(&identity.schema_key());

    if let Err(failure) = checks::name::check(identity, &scoped, settings) {
        return FileValidation::new(ValidationOutcome::Failed(failure), None);
    }

    let table = match load() {
        Ok(table) => table,
        Err(IngestError::Storage(error)) => {
            tracing::warn!(file = %identity.file_path(), %error, "cannot read file");
            return FileValidation::new(
                ValidationOutcome::Unreadable {
                    reason: error.to_string(),
                },
                None,
            );
        }
        Err(error) => {
            tracing::info!(file = %identity.file_path(), %error, "malformed csv content");
            let failure = ValidationFailure::MalformedContent {
                reason: error.to_string(),
            };
            return FileValidation::new(ValidationOutcome::Failed(failure), None);
        }
    };

    if let Err(failure) = checks::empty::check(&table) {
        return FileValidation::new(ValidationOutcome::Failed(failure), None);
    }

    let row_count = Some(table.height());
    let result: CheckResult = checks::structure::check(&table, &scoped)
        .and_then(|()| checks::datatype::check(&table, &scoped))
        .and_then(|()| checks::primary_key::check(&table, &scoped));
    let outcome = match result {
        Ok(()) => ValidationOutcome::Success,
        Err(failure) => ValidationOutcome::Failed(failure),
    };
    FileValidation::new(outcome, row_count)
}

/// Run the pipeline on an object in storage.
///
/// `key` is the object key as received; lookups use the case-folded identity.
pub fn validate_object(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    identity: &FileIdentity,
    metadata: &Metadata,
    settings: &ValidationSettings,
) -> FileValidation {
    validate(identity, metadata, settings, || {
        let bytes = store.get_object(bucket, key)?;
        read_csv_table(&bytes)
    })
}
