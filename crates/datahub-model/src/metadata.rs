use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data_type::FieldPattern;
use crate::identity::SchemaKey;

/// One row of the file schema table (`metadata.csv`).
///
/// Rows sharing a (partner, program, folder, file) key, ordered by `row_id`,
/// form the canonical column list for that file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRow {
    pub partner: String,
    pub program: String,
    pub folder: String,
    /// Logical file name, after partner swaps.
    pub file: String,
    pub field: String,
    pub data_type: Option<String>,
    pub length: Option<String>,
    pub mandatory_values: Option<String>,
    pub unique_pk: bool,
    pub row_id: i64,
}

impl MetadataRow {
    pub fn folder_path(&self) -> String {
        format!("{}/{}/{}", self.partner, self.program, self.folder)
    }

    pub fn schema_key(&self) -> SchemaKey {
        SchemaKey::new(&self.partner, &self.program, &self.folder, &self.file)
    }
}

/// One row of the field rules table (`fieldnames.csv`).
///
/// Rules are partner and program agnostic: a rule applies to any file that
/// carries a column with the rule's field name.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub file: String,
    pub field: String,
    pub data_type: Option<String>,
    pub length: Option<String>,
    pub mandatory_values: Option<String>,
    pub pk: bool,
    /// Pattern derived from this rule's own type triplet, if it declares one.
    pub default_pattern: Option<FieldPattern>,
}

/// Partner-declared rename of a logical file name within one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSwap {
    pub from: String,
    pub to: String,
}

/// One row of the partner schedule table (`partner_schedule.csv`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerSchedule {
    pub partner: String,
    /// `HH:MM` times at which the daily arrival check runs.
    pub run_hours: BTreeSet<String>,
    pub programs: Vec<String>,
    /// Semicolon-delimited internal recipients, empty when none.
    pub internal_emails: String,
    /// Semicolon-delimited partner recipients, empty when none.
    pub partner_emails: String,
    /// Logical files not expected from a program.
    pub ignore_files: BTreeMap<String, Vec<String>>,
    /// Logical file renames per program.
    pub swap_files: BTreeMap<String, Vec<FileSwap>>,
}

impl PartnerSchedule {
    pub fn swaps_for(&self, program: &str) -> &[FileSwap] {
        self.swap_files
            .get(program)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn ignored_for(&self, program: &str) -> &[String] {
        self.ignore_files
            .get(program)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
