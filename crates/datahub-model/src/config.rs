//! Run configuration.
//!
//! A single [`DatahubConfig`] value is built at startup (usually from a TOML
//! file) and passed to every component. Every field has a default, so a config
//! file only needs the keys it overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The eight logical file types a partner program may send.
pub const RECOGNIZED_FILES: [&str; 8] = [
    "applications",
    "degree_course_memberships",
    "degree_courses",
    "degree_terms_courses",
    "degree_program_memberships",
    "degree_term_memberships",
    "terms",
    "students",
];

/// Logical file types that land in partner folders but are never validated.
pub const EXCLUDED_FILES: [&str; 2] = ["finance_transactions", "finance_metadata"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatahubConfig {
    pub storage: StorageSettings,
    pub metadata: MetadataSettings,
    pub validation: ValidationSettings,
    pub logs: LogSettings,
    pub email: EmailSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding one sub-directory per bucket.
    pub root: PathBuf,
    pub partner_bucket: String,
    pub settings_bucket: String,
    pub logs_bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("buckets"),
            partner_bucket: "coursera-degrees-data".to_string(),
            settings_bucket: "coursera-data-engineering".to_string(),
            logs_bucket: "coursera-data-engineering".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataSettings {
    pub schema_key: String,
    pub field_rules_key: String,
    pub partner_schedule_key: String,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        let folder = "datahub/datahub_validator/settings";
        Self {
            schema_key: format!("{folder}/metadata.csv"),
            field_rules_key: format!("{folder}/fieldnames.csv"),
            partner_schedule_key: format!("{folder}/partner_schedule.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    pub recognized_files: Vec<String>,
    pub excluded_files: Vec<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            recognized_files: RECOGNIZED_FILES.iter().map(|name| name.to_string()).collect(),
            excluded_files: EXCLUDED_FILES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl ValidationSettings {
    pub fn is_recognized(&self, logical_name: &str) -> bool {
        self.recognized_files.iter().any(|name| name == logical_name)
    }

    pub fn is_excluded(&self, logical_name: &str) -> bool {
        self.excluded_files.iter().any(|name| name == logical_name)
    }
}

/// How the log store decides that a failure was already reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DedupStrategy {
    /// Same description text as an earlier record.
    #[default]
    Description,
    /// Same error code and file name (the file name carries its date).
    CodeAndFile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub root: String,
    pub dedup: DedupStrategy,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            root: "datahub/datahub_validator/logs".to_string(),
            dedup: DedupStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub from: String,
    pub reply_to: String,
    pub organization: String,
    pub support_address: String,
    /// Directory where outgoing messages are written; logged only when unset.
    pub outbox: Option<PathBuf>,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            from: "datahub@coursera.org".to_string(),
            reply_to: "datahub@coursera.org".to_string(),
            organization: "Coursera".to_string(),
            support_address: "partner-support@coursera.org".to_string(),
            outbox: None,
        }
    }
}
