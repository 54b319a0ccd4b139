//! Results of running the validation pipeline on one file.

use serde::{Deserialize, Serialize};

use crate::enums::ErrorCode;

/// Values of one field that failed its data type pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldExceptions {
    pub field: String,
    /// Offending values in row order; missing cells are shown as `null`.
    pub values: Vec<String>,
}

/// A primary-key tuple that occurs more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub values: Vec<String>,
    /// Number of rows carrying this key (always at least 2).
    pub count: usize,
}

/// Primary-key columns and every key tuple that is not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PkViolations {
    pub columns: Vec<String>,
    /// Sorted by key values.
    pub duplicates: Vec<DuplicateKey>,
}

impl PkViolations {
    /// Total duplicate count reported to partners.
    ///
    /// This is the sum of raw occurrence counts of every duplicated key, so two
    /// keys that each appear twice report 4.
    pub fn total_duplicates(&self) -> usize {
        self.duplicates.iter().map(|key| key.count).sum()
    }
}

/// A failed check, carrying the payload its error code needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationFailure {
    WrongFileName { path: Vec<String> },
    WrongFileStructure {
        supplied: Vec<String>,
        expected: Vec<String>,
    },
    EmptyFile,
    /// The content is not well-formed CSV. Reported under the empty-file code.
    MalformedContent { reason: String },
    WrongFieldDataTypes { exceptions: Vec<FieldExceptions> },
    PkViolation { violations: PkViolations },
}

impl ValidationFailure {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ValidationFailure::WrongFileName { .. } => ErrorCode::WrongFileName,
            ValidationFailure::WrongFileStructure { .. } => ErrorCode::WrongFileStructure,
            ValidationFailure::EmptyFile | ValidationFailure::MalformedContent { .. } => {
                ErrorCode::EmptyFile
            }
            ValidationFailure::WrongFieldDataTypes { .. } => ErrorCode::WrongFieldDataTypes,
            ValidationFailure::PkViolation { .. } => ErrorCode::PkViolation,
        }
    }
}

/// Outcome of the validation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Success,
    Failed(ValidationFailure),
    /// The object could not be fetched from storage.
    Unreadable { reason: String },
}

impl ValidationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ValidationOutcome::Success)
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            ValidationOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Pipeline outcome plus what was learned about the file along the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValidation {
    pub outcome: ValidationOutcome,
    /// Data row count, known once the structure check has run.
    pub row_count: Option<usize>,
}

impl FileValidation {
    pub fn new(outcome: ValidationOutcome, row_count: Option<usize>) -> Self {
        Self { outcome, row_count }
    }
}

/// Files a partner did not deliver by a scheduled check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFiles {
    pub partner: String,
    /// `HH:MM` (UTC) of the check that found the gap.
    pub time_check: String,
    /// Expected object keys, sorted.
    pub files: Vec<String>,
    pub partner_emails: String,
    pub internal_emails: String,
}
