//! Field data type check (error code 4).
//!
//! Every column that has a field rule is tested against a validity pattern.
//! The pattern comes from the type declared for the column in the file's
//! schema rows when there is one, otherwise from the field rule itself.

use datahub_ingest::CsvTable;
use datahub_metadata::{ScopedMetadata, regex_for};
use datahub_model::{FieldExceptions, FieldPattern, FieldRule, ValidationFailure};

use super::CheckResult;

/// Shown in place of missing cells.
const MISSING_VALUE: &str = "null";

pub fn check(table: &CsvTable, scoped: &ScopedMetadata<'_>) -> CheckResult {
    let mut exceptions = Vec::new();
    for (index, column) in table.headers.iter().enumerate() {
        let Some(rule) = rule_for(scoped, column) else {
            continue;
        };
        let Some(pattern) = effective_pattern(scoped, rule) else {
            tracing::debug!(field = %column, "no pattern for field, skipping");
            continue;
        };
        let values: Vec<String> = table
            .column(index)
            .filter(|value| !pattern.is_valid(*value))
            .map(|value| value.unwrap_or(MISSING_VALUE).to_string())
            .collect();
        if !values.is_empty() {
            tracing::debug!(field = %column, exceptions = values.len(), "field has invalid values");
            exceptions.push(FieldExceptions {
                field: rule.field.clone(),
                values,
            });
        }
    }
    if exceptions.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure::WrongFieldDataTypes { exceptions })
    }
}

/// Rule for a column, preferring one registered for this logical file.
fn rule_for<'a>(scoped: &ScopedMetadata<'a>, column: &str) -> Option<&'a FieldRule> {
    let mut candidates = scoped
        .field_rules()
        .iter()
        .filter(|rule| rule.field.eq_ignore_ascii_case(column));
    let first = candidates.next()?;
    if first.file == scoped.key().file {
        return Some(first);
    }
    Some(
        candidates
            .find(|rule| rule.file == scoped.key().file)
            .unwrap_or(first),
    )
}

fn effective_pattern(scoped: &ScopedMetadata<'_>, rule: &FieldRule) -> Option<FieldPattern> {
    let declared = scoped
        .row_for_field(&rule.field)
        .filter(|row| row.data_type.is_some());
    if let Some(row) = declared {
        match regex_for(
            row.data_type.as_deref(),
            row.length.as_deref(),
            row.mandatory_values.as_deref(),
        ) {
            Ok(Some(pattern)) => return Some(pattern),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    schema = %scoped.key(),
                    field = %rule.field,
                    %error,
                    "schema type unusable, falling back to field rule"
                );
            }
        }
    }
    rule.default_pattern.clone()
}
