//! Partner-facing descriptions of validation failures.
//!
//! The text is sent verbatim in alert emails and doubles as the log store's
//! default dedup key, so a given failure must always produce the same text.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use datahub_model::{FieldExceptions, PkViolations, ValidationFailure};

/// Sample values or keys quoted per finding.
const SAMPLE_SIZE: usize = 3;

/// Describe a failure of `file_name`.
///
/// `row_count` is only used by structure failures.
pub fn describe(failure: &ValidationFailure, file_name: &str, row_count: Option<usize>) -> String {
    match failure {
        ValidationFailure::WrongFileName { .. } => {
            format!("\n\t{file_name} : File wrongly Named and cannot be processed.")
        }
        ValidationFailure::WrongFileStructure { supplied, expected } => {
            describe_structure(file_name, row_count, supplied, expected)
        }
        ValidationFailure::EmptyFile => ": empty file sent".to_string(),
        ValidationFailure::MalformedContent { reason } => {
            format!("\n\t{file_name} : File cannot be read as CSV: {reason}")
        }
        ValidationFailure::WrongFieldDataTypes { exceptions } => describe_datatypes(exceptions),
        ValidationFailure::PkViolation { violations } => describe_pk(violations),
    }
}

fn describe_structure(
    file_name: &str,
    row_count: Option<usize>,
    supplied: &[String],
    expected: &[String],
) -> String {
    let rows = row_count.map(|count| count.to_string()).unwrap_or_default();
    let mut desc = format!("\n\t{file_name}: Number of Rows:  {rows}");

    if supplied.len() != expected.len() {
        let _ = write!(
            desc,
            "\n\t\tsupplied:  {} fields instead of:  {} fields",
            supplied.len(),
            expected.len()
        );
        let supplied_set: BTreeSet<&str> = supplied.iter().map(String::as_str).collect();
        let expected_set: BTreeSet<&str> = expected.iter().map(String::as_str).collect();
        let missing: Vec<&str> = expected
            .iter()
            .map(String::as_str)
            .filter(|field| !supplied_set.contains(field))
            .collect();
        let extra: Vec<&str> = supplied
            .iter()
            .map(String::as_str)
            .filter(|field| !expected_set.contains(field))
            .collect();
        if !missing.is_empty() {
            let _ = write!(desc, ".\n\t\tMissing fields: {}", missing.join(", "));
        }
        if !extra.is_empty() {
            let _ = write!(desc, ".\n\t\tWrong fields supplied: {}", extra.join(", "));
        }
    } else {
        for (given, wanted) in supplied.iter().zip(expected) {
            if given != wanted {
                let _ = write!(desc, "\n\t\tsupplied:  '{given}' instead of:  '{wanted}'");
            }
        }
        desc.push_str(".\n\tFile is poorly formatted and cannot be processed.");
    }
    desc
}

fn describe_datatypes(exceptions: &[FieldExceptions]) -> String {
    let mut desc = String::new();
    for exception in exceptions {
        let samples: Vec<&str> = exception
            .values
            .iter()
            .take(SAMPLE_SIZE)
            .map(String::as_str)
            .collect();
        let _ = write!(
            desc,
            "\n\tMandatory Field: {}: Number of Exceptions: {}: wrong values include: {}....",
            exception.field,
            exception.values.len(),
            samples.join(", ")
        );
    }
    desc
}

fn describe_pk(violations: &PkViolations) -> String {
    let mut desc = format!(
        "\n\tDuplicates in Primary Key columns:\n\t\t{}: Total Duplicates: {}",
        violations.columns.join(", "),
        violations.total_duplicates()
    );
    for key in violations.duplicates.iter().take(SAMPLE_SIZE) {
        let _ = write!(
            desc,
            "\n\t\tFor: {}: Duplicates: {}",
            key.values.join(", "),
            key.count
        );
    }
    desc.push_str("\n\t\t...........");
    desc
}
