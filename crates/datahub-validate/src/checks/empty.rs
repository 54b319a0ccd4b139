//! Empty file check (error code 3).

use datahub_ingest::CsvTable;
use datahub_model::ValidationFailure;

use super::CheckResult;

/// A file without data rows cannot be validated further.
pub fn check(table: &CsvTable) -> CheckResult {
    if table.is_empty() {
        Err(ValidationFailure::EmptyFile)
    } else {
        Ok(())
    }
}
