//! Column structure check (error code 2).

use datahub_ingest::CsvTable;
use datahub_metadata::ScopedMetadata;
use datahub_model::ValidationFailure;

use super::CheckResult;

/// Supplied columns must equal the schema's columns, in order.
pub fn check(table: &CsvTable, scoped: &ScopedMetadata<'_>) -> CheckResult {
    let expected = scoped.expected_fields();
    if table.headers == expected {
        return Ok(());
    }
    Err(ValidationFailure::WrongFileStructure {
        supplied: table.headers.clone(),
        expected,
    })
}
