//! In-memory view of the three metadata tables.

use std::collections::BTreeSet;

use datahub_model::{FieldRule, MetadataRow, PartnerSchedule, SchemaKey};

use crate::swap::{apply_rule_swaps, apply_schema_swaps};

/// Schema table, field rules and partner schedules for one run.
///
/// Built once, with partner swaps already applied, and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    schema: Vec<MetadataRow>,
    field_rules: Vec<FieldRule>,
    schedules: Vec<PartnerSchedule>,
    folder_paths: BTreeSet<String>,
}

impl Metadata {
    pub fn new(
        mut schema: Vec<MetadataRow>,
        mut field_rules: Vec<FieldRule>,
        schedules: Vec<PartnerSchedule>,
    ) -> Self {
        schema.sort_by_key(|row| row.row_id);
        apply_schema_swaps(&mut schema, &schedules);
        apply_rule_swaps(&mut field_rules, &schedules);
        let folder_paths = schema.iter().map(MetadataRow::folder_path).collect();
        Self {
            schema,
            field_rules,
            schedules,
            folder_paths,
        }
    }

    pub fn schema_rows(&self) -> &[MetadataRow] {
        &self.schema
    }

    pub fn field_rules(&self) -> &[FieldRule] {
        &self.field_rules
    }

    pub fn schedules(&self) -> &[PartnerSchedule] {
        &self.schedules
    }

    /// Every `partner/program/folder` path that has a schema.
    pub fn folder_paths(&self) -> &BTreeSet<String> {
        &self.folder_paths
    }

    pub fn has_folder_path(&self, folder_path: &str) -> bool {
        self.folder_paths.contains(folder_path)
    }

    /// Distinct schema keys, sorted.
    pub fn schema_keys(&self) -> BTreeSet<SchemaKey> {
        self.schema.iter().map(MetadataRow::schema_key).collect()
    }

    pub fn schedule_for(&self, partner: &str) -> Option<&PartnerSchedule> {
        self.schedules
            .iter()
            .find(|schedule| schedule.partner == partner)
    }

    /// Restrict the tables to what one file needs.
    pub fn scoped(&self, key: &SchemaKey) -> ScopedMetadata<'_> {
        let rows = self
            .schema
            .iter()
            .filter(|row| {
                row.partner == key.partner
                    && row.program == key.program
                    && row.folder == key.folder
                    && row.file == key.file
            })
            .collect();
        ScopedMetadata {
            key: key.clone(),
            rows,
            field_rules: &self.field_rules,
            schedule: self.schedule_for(&key.partner),
        }
    }
}

/// Metadata relevant to a single schema key.
#[derive(Debug, Clone)]
pub struct ScopedMetadata<'a> {
    key: SchemaKey,
    rows: Vec<&'a MetadataRow>,
    field_rules: &'a [FieldRule],
    schedule: Option<&'a PartnerSchedule>,
}

impl<'a> ScopedMetadata<'a> {
    pub fn key(&self) -> &SchemaKey {
        &self.key
    }

    /// True when the schema table has at least one row for the key.
    pub fn has_schema(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Schema rows in `row_id` order.
    pub fn rows(&self) -> &[&'a MetadataRow] {
        &self.rows
    }

    /// Canonical column list of the file.
    pub fn expected_fields(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.field.clone()).collect()
    }

    /// Schema row declaring a field, compared case-insensitively.
    pub fn row_for_field(&self, field: &str) -> Option<&'a MetadataRow> {
        self.rows
            .iter()
            .copied()
            .find(|row| row.field.eq_ignore_ascii_case(field))
    }

    /// All field rules; they apply across partners and files.
    pub fn field_rules(&self) -> &'a [FieldRule] {
        self.field_rules
    }

    /// Field rules registered for this logical file.
    pub fn file_rules(&self) -> impl Iterator<Item = &'a FieldRule> + '_ {
        self.field_rules
            .iter()
            .filter(|rule| rule.file == self.key.file)
    }

    /// Primary-key columns.
    ///
    /// Schema rows flagged `unique_pk` win; otherwise the file's field rules
    /// flagged `pk` are used. Empty when neither declares a key.
    pub fn pk_columns(&self) -> Vec<String> {
        let from_schema: Vec<String> = self
            .rows
            .iter()
            .filter(|row| row.unique_pk)
            .map(|row| row.field.clone())
            .collect();
        if !from_schema.is_empty() {
            return from_schema;
        }
        self.file_rules()
            .filter(|rule| rule.pk)
            .map(|rule| rule.field.clone())
            .collect()
    }

    pub fn schedule(&self) -> Option<&'a PartnerSchedule> {
        self.schedule
    }
}
