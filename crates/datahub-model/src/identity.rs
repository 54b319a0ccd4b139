use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::FolderKind;

/// Lookup key for a file's expected column structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaKey {
    pub partner: String,
    pub program: String,
    pub folder: String,
    pub file: String,
}

impl SchemaKey {
    pub fn new(partner: &str, program: &str, folder: &str, file: &str) -> Self {
        Self {
            partner: partner.to_string(),
            program: program.to_string(),
            folder: folder.to_string(),
            file: file.to_string(),
        }
    }

    pub fn folder_path(&self) -> String {
        format!("{}/{}/{}", self.partner, self.program, self.folder)
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.partner, self.program, self.folder, self.file
        )
    }
}

/// Decomposed storage key of one incoming partner file.
///
/// Built once per event from `partner/program/folder/<logical>_<yyyymmdd>.<ext>`
/// and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIdentity {
    pub partner: String,
    pub program: String,
    pub folder: FolderKind,
    /// File name with date stamp and extension.
    pub file_name: String,
    /// File name without the trailing `_<date segment>`.
    pub logical_name: String,
    /// Everything after the last underscore, e.g. `20200128.csv`.
    pub date_segment: String,
}

impl FileIdentity {
    /// Build an identity from lower-cased key segments.
    ///
    /// Returns `None` unless there are exactly four segments and the third
    /// names a recognized folder.
    pub fn from_segments(segments: &[String]) -> Option<Self> {
        let [partner, program, folder, file_name] = segments else {
            return None;
        };
        let folder = folder.parse::<FolderKind>().ok()?;
        let (logical_name, date_segment) = match file_name.rsplit_once('_') {
            Some((logical, date)) => (logical.to_string(), date.to_string()),
            None => (String::new(), file_name.clone()),
        };
        Some(Self {
            partner: partner.clone(),
            program: program.clone(),
            folder,
            file_name: file_name.clone(),
            logical_name,
            date_segment,
        })
    }

    /// The 8-digit stamp candidate (the date segment up to its first dot).
    pub fn date_stamp(&self) -> &str {
        self.date_segment
            .split_once('.')
            .map_or(self.date_segment.as_str(), |(stamp, _)| stamp)
    }

    pub fn file_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.partner, self.program, self.folder, self.file_name
        )
    }

    pub fn folder_path(&self) -> String {
        format!("{}/{}/{}", self.partner, self.program, self.folder)
    }

    pub fn path_segments(&self) -> Vec<String> {
        vec![
            self.partner.clone(),
            self.program.clone(),
            self.folder.to_string(),
            self.file_name.clone(),
        ]
    }

    pub fn schema_key(&self) -> SchemaKey {
        SchemaKey::new(
            &self.partner,
            &self.program,
            self.folder.as_str(),
            &self.logical_name,
        )
    }
}
