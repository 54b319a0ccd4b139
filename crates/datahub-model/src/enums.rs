//! Type-safe enumerations for DataHub concepts.
//!
//! These enums give compile-time safety to values that arrive as plain
//! strings in object keys and metadata tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Partner folder a file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    Applications,
    Enrollments,
}

impl FolderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FolderKind::Applications => "applications",
            FolderKind::Enrollments => "enrollments",
        }
    }

    /// Folder that a logical file is expected in.
    ///
    /// Only the `applications` file lives in the applications folder; every
    /// other recognized file is an enrollment extract.
    pub fn for_logical_name(name: &str) -> Self {
        if name == "applications" {
            FolderKind::Applications
        } else {
            FolderKind::Enrollments
        }
    }
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FolderKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "applications" => Ok(FolderKind::Applications),
            "enrollments" => Ok(FolderKind::Enrollments),
            other => Err(ModelError::UnknownFolder(other.to_string())),
        }
    }
}

/// Alert priority attached to a log record and the email subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation error codes, in pipeline order of the checks that raise them.
///
/// The numeric values are persisted in log files and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCode {
    WrongFileName,
    WrongFileStructure,
    EmptyFile,
    WrongFieldDataTypes,
    PkViolation,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 5] = [
        ErrorCode::WrongFileName,
        ErrorCode::WrongFileStructure,
        ErrorCode::EmptyFile,
        ErrorCode::WrongFieldDataTypes,
        ErrorCode::PkViolation,
    ];

    pub fn code(&self) -> u8 {
        match self {
            ErrorCode::WrongFileName => 1,
            ErrorCode::WrongFileStructure => 2,
            ErrorCode::EmptyFile => 3,
            ErrorCode::WrongFieldDataTypes => 4,
            ErrorCode::PkViolation => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.code() == code)
    }

    /// Short description stored in the `error_type` log column.
    pub fn error_type(&self) -> &'static str {
        match self {
            ErrorCode::WrongFileName => "wrong file name",
            ErrorCode::WrongFileStructure => "wrong file structure",
            ErrorCode::EmptyFile => "empty file",
            ErrorCode::WrongFieldDataTypes => "wrong field data types",
            ErrorCode::PkViolation => "PK Violation",
        }
    }

    pub fn priority(&self) -> Priority {
        match self {
            ErrorCode::PkViolation => Priority::Urgent,
            _ => Priority::Critical,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
