//! Loading of the settings tables from object storage.

use std::collections::BTreeMap;

use datahub_ingest::{IngestError, ObjectStore, get_field, get_optional, read_csv_rows};
use datahub_model::{DatahubConfig, FieldRule, MetadataRow, PartnerSchedule, is_blank};

use crate::error::{MetadataError, Result};
use crate::regex::regex_for;
use crate::store::Metadata;
use crate::swap::{parse_ignore_spec, parse_swap_spec};

type Row = BTreeMap<String, String>;

const SCHEMA_COLUMNS: [&str; 6] = ["partner", "program", "folder", "file", "field", "row_id"];
const FIELD_RULE_COLUMNS: [&str; 2] = ["file", "field"];
const SCHEDULE_COLUMNS: [&str; 1] = ["partner"];

/// Load and assemble the metadata tables named in the configuration.
pub fn load_metadata(store: &dyn ObjectStore, config: &DatahubConfig) -> Result<Metadata> {
    let bucket = &config.storage.settings_bucket;
    let settings = &config.metadata;
    let schema = read_table(store, bucket, &settings.schema_key)?;
    let rules = read_table(store, bucket, &settings.field_rules_key)?;
    let schedules = read_table(store, bucket, &settings.partner_schedule_key)?;
    let metadata = Metadata::new(
        schema_rows(&settings.schema_key, &schema)?,
        field_rules(&settings.field_rules_key, &rules)?,
        partner_schedules(&settings.partner_schedule_key, &schedules)?,
    );
    tracing::info!(
        schema_rows = metadata.schema_rows().len(),
        field_rules = metadata.field_rules().len(),
        partners = metadata.schedules().len(),
        "metadata loaded"
    );
    Ok(metadata)
}

/// Assemble metadata from raw table bytes.
pub fn parse_metadata(schema: &[u8], rules: &[u8], schedules: &[u8]) -> Result<Metadata> {
    let decode = |key: &str, bytes: &[u8]| {
        read_csv_rows(bytes).map_err(|source| MetadataError::Read {
            key: key.to_string(),
            source,
        })
    };
    Ok(Metadata::new(
        schema_rows("metadata.csv", &decode("metadata.csv", schema)?)?,
        field_rules("fieldnames.csv", &decode("fieldnames.csv", rules)?)?,
        partner_schedules(
            "partner_schedule.csv",
            &decode("partner_schedule.csv", schedules)?,
        )?,
    ))
}

fn read_table(store: &dyn ObjectStore, bucket: &str, key: &str) -> Result<Vec<Row>> {
    let read_error = |source: IngestError| MetadataError::Read {
        key: key.to_string(),
        source,
    };
    let bytes = store
        .get_object(bucket, key)
        .map_err(|err| read_error(err.into()))?;
    read_csv_rows(&bytes).map_err(read_error)
}

fn require_columns(key: &str, rows: &[Row], columns: &[&str]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    match columns.iter().find(|column| !first.contains_key(**column)) {
        Some(column) => Err(MetadataError::MissingColumn {
            key: key.to_string(),
            column: (*column).to_string(),
        }),
        None => Ok(()),
    }
}

/// First non-blank value among alternative column names.
fn optional_any(row: &Row, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| get_optional(row, key))
        .find(|value| !is_blank(value))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "1.0" | "true" | "yes" | "y"
    )
}

fn parse_row_id(key: &str, raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    digits.parse().map_err(|_| MetadataError::InvalidRowId {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn lower(row: &Row, key: &str) -> String {
    get_field(row, key).to_lowercase()
}

/// Schema table rows, in file order (sorting happens in [`Metadata::new`]).
pub fn schema_rows(key: &str, rows: &[Row]) -> Result<Vec<MetadataRow>> {
    require_columns(key, rows, &SCHEMA_COLUMNS)?;
    rows.iter()
        .filter(|row| !get_field(row, "field").is_empty())
        .map(|row| -> Result<MetadataRow> {
            Ok(MetadataRow {
                partner: lower(row, "partner"),
                program: lower(row, "program"),
                folder: lower(row, "folder"),
                file: lower(row, "file"),
                field: lower(row, "field"),
                data_type: optional_any(row, &["data_type", "unique_data_type"]),
                length: optional_any(row, &["length", "unique_length"]),
                mandatory_values: optional_any(
                    row,
                    &["mandatory_values", "unique_mandatory_values"],
                ),
                unique_pk: parse_flag(&get_field(row, "unique_pk")),
                row_id: parse_row_id(key, &get_field(row, "row_id"))?,
            })
        })
        .collect()
}

/// Field rules with their default patterns.
///
/// A rule whose own type cannot be turned into a pattern is kept without one
/// and reported.
pub fn field_rules(key: &str, rows: &[Row]) -> Result<Vec<FieldRule>> {
    require_columns(key, rows, &FIELD_RULE_COLUMNS)?;
    let rules = rows
        .iter()
        .filter(|row| !get_field(row, "field").is_empty())
        .map(|row| {
            let file = lower(row, "file");
            let field = lower(row, "field");
            let data_type = optional_any(row, &["data_type"]);
            let length = optional_any(row, &["length"]);
            let mandatory_values = optional_any(row, &["mandatory_values"]);
            let default_pattern = match regex_for(
                data_type.as_deref(),
                length.as_deref(),
                mandatory_values.as_deref(),
            ) {
                Ok(pattern) => pattern,
                Err(error) => {
                    tracing::warn!(%file, %field, %error, "field rule has no usable pattern");
                    None
                }
            };
            FieldRule {
                pk: parse_flag(&get_field(row, "pk")),
                file,
                field,
                data_type,
                length,
                mandatory_values,
                default_pattern,
            }
        })
        .collect();
    Ok(rules)
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !is_blank(item))
        .map(str::to_string)
}

fn email_list(value: &str) -> String {
    if is_blank(value) {
        String::new()
    } else {
        value.chars().filter(|ch| !ch.is_whitespace()).collect()
    }
}

/// Partner schedules. Malformed override cells are reported and ignored.
pub fn partner_schedules(key: &str, rows: &[Row]) -> Result<Vec<PartnerSchedule>> {
    require_columns(key, rows, &SCHEDULE_COLUMNS)?;
    let schedules = rows
        .iter()
        .filter(|row| !get_field(row, "partner").is_empty())
        .map(|row| {
            let partner = lower(row, "partner");
            let swap_files = parse_swap_spec(&partner, &get_field(row, "swap_files"))
                .unwrap_or_else(|error| {
                    tracing::warn!(%partner, %error, "ignoring swap_files");
                    BTreeMap::new()
                });
            let ignore_files = parse_ignore_spec(&partner, &get_field(row, "ignore_files"))
                .unwrap_or_else(|error| {
                    tracing::warn!(%partner, %error, "ignoring ignore_files");
                    BTreeMap::new()
                });
            PartnerSchedule {
                run_hours: split_list(&get_field(row, "run_hour")).collect(),
                programs: split_list(&get_field(row, "programs"))
                    .map(|program| program.to_lowercase())
                    .collect(),
                internal_emails: email_list(&get_field(row, "internal_emails")),
                partner_emails: email_list(&get_field(row, "partner_emails")),
                ignore_files,
                swap_files,
                partner,
            }
        })
        .collect();
    Ok(schedules)
}
