use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{ErrorCode, Priority};

/// Column order of every log file. Appends depend on it never changing.
pub const LOG_COLUMNS: [&str; 19] = [
    "error_code",
    "error_type",
    "supplied_fields",
    "expected_fields",
    "no_supplied_fields",
    "no_expected_fields",
    "description",
    "partner",
    "program",
    "file_name",
    "file_path",
    "file_no_of_rows",
    "log_file_name",
    "log_file_path",
    "priority",
    "partner_emails",
    "internal_emails",
    "send_email",
    "date_time",
];

/// Timestamp layout used in the `date_time` column.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One validation failure as persisted in a per-partner-program log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub error_code: ErrorCode,
    pub error_type: String,
    /// Comma-joined supplied columns (structure failures only).
    pub supplied_fields: String,
    /// Comma-joined expected columns (structure failures only).
    pub expected_fields: String,
    pub no_supplied_fields: Option<usize>,
    pub no_expected_fields: Option<usize>,
    pub description: String,
    pub partner: String,
    pub program: String,
    pub file_name: String,
    pub file_path: String,
    pub file_no_of_rows: Option<usize>,
    pub log_file_name: String,
    pub log_file_path: String,
    pub priority: Priority,
    pub partner_emails: String,
    pub internal_emails: String,
    pub send_email: bool,
    pub date_time: DateTime<Utc>,
}

impl LogRecord {
    /// Cells in [`LOG_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.error_code.to_string(),
            self.error_type.clone(),
            self.supplied_fields.clone(),
            self.expected_fields.clone(),
            optional_count(self.no_supplied_fields),
            optional_count(self.no_expected_fields),
            self.description.clone(),
            self.partner.clone(),
            self.program.clone(),
            self.file_name.clone(),
            self.file_path.clone(),
            optional_count(self.file_no_of_rows),
            self.log_file_name.clone(),
            self.log_file_path.clone(),
            self.priority.to_string(),
            self.partner_emails.clone(),
            self.internal_emails.clone(),
            if self.send_email { "True" } else { "False" }.to_string(),
            self.date_time.format(LOG_TIMESTAMP_FORMAT).to_string(),
        ]
    }
}

fn optional_count(value: Option<usize>) -> String {
    value.map(|count| count.to_string()).unwrap_or_default()
}
