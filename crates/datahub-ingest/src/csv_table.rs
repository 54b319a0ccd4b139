//! Decoding of partner CSV files and metadata tables.

use std::borrow::Cow;
use std::collections::BTreeMap;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::WINDOWS_1252;

use crate::error::{IngestError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell text that the pipeline treats as a missing value.
pub const NULL_MARKER: &str = "NULL";

/// A partner file held as string cells.
///
/// Headers are lower-cased. Missing cells (`""` or `NULL`) are `None`, and
/// every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl CsvTable {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, compared case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim().to_lowercase();
        self.headers.iter().position(|header| *header == name)
    }

    /// Cells of one column in row order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|cell| cell.as_deref()))
    }
}

/// Decode raw bytes as text.
///
/// UTF-8 is tried first (a leading byte-order mark is dropped); anything
/// else is read as Windows-1252, which maps every byte.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            tracing::debug!("input is not UTF-8, decoding as windows-1252");
            let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text
        }
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_lowercase()
}

fn normalize_cell(raw: &str) -> Option<String> {
    if raw.is_empty() || raw == NULL_MARKER {
        None
    } else {
        Some(raw.to_string())
    }
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(str::is_empty)
}

/// Parse a partner file.
///
/// Short rows are padded with missing cells; a row with more cells than the
/// header is an error.
pub fn read_csv_table(bytes: &[u8]) -> Result<CsvTable> {
    let text = decode_text(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(String::is_empty) {
        return Ok(CsvTable::default());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if is_blank_record(&record) {
            continue;
        }
        if record.len() > headers.len() {
            return Err(IngestError::RaggedRow {
                line: record.position().map(csv::Position::line).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            });
        }
        let mut row: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
        row.resize(headers.len(), None);
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}

/// Read a metadata table into one map per row.
///
/// Keys are lower-cased headers and values are trimmed.
pub fn read_csv_rows(bytes: &[u8]) -> Result<Vec<BTreeMap<String, String>>> {
    let text = decode_text(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if is_blank_record(&record) {
            continue;
        }
        let row = headers
            .iter()
            .enumerate()
            .map(|(idx, key)| (key.clone(), record.get(idx).unwrap_or("").trim().to_string()))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Get a field value from a row, returning an empty string if not present.
pub fn get_field(row: &BTreeMap<String, String>, key: &str) -> String {
    row.get(key).cloned().unwrap_or_default()
}

/// Get an optional field value from a row (None if empty or missing).
pub fn get_optional(row: &BTreeMap<String, String>, key: &str) -> Option<String> {
    row.get(key).filter(|v| !v.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nulls_and_padding() {
        let table = read_csv_table(b"Student_ID,Name,Email\n1,NULL,a@b.co\n2,,\n3\n").unwrap();
        assert_eq!(table.headers, vec!["student_id", "name", "email"]);
        assert_eq!(table.height(), 3);
        assert_eq!(table.rows[0], vec![Some("1".into()), None, Some("a@b.co".into())]);
        assert_eq!(table.rows[1], vec![Some("2".into()), None, None]);
        assert_eq!(table.rows[2], vec![Some("3".into()), None, None]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let table = read_csv_table(b"a,b\n\n1,2\n\n").unwrap();
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        let table = read_csv_table(b"a,b\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.width(), 2);
        assert!(read_csv_table(b"").unwrap().is_empty());
    }

    #[test]
    fn test_long_row_rejected() {
        let err = read_csv_table(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            IngestError::RaggedRow {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_bom_and_latin1() {
        let table = read_csv_table(b"\xEF\xBB\xBFterm_id\nt1\n").unwrap();
        assert_eq!(table.headers, vec!["term_id"]);

        let table = read_csv_table(b"name\nJos\xE9\n").unwrap();
        assert_eq!(table.rows[0][0].as_deref(), Some("Jos\u{e9}"));
    }

    #[test]
    fn test_column_lookup() {
        let table = read_csv_table(b"a,B\n1,2\n3,NULL\n").unwrap();
        assert_eq!(table.column_index("b"), Some(1));
        assert_eq!(table.column_index(" A "), Some(0));
        let values: Vec<_> = table.column(1).collect();
        assert_eq!(values, vec![Some("2"), None]);
    }

    #[test]
    fn test_read_csv_rows() {
        let rows = read_csv_rows(b"Partner,Program\n test ,degree\nother\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(get_field(&rows[0], "partner"), "test");
        assert_eq!(get_optional(&rows[1], "program"), None);
        assert_eq!(get_field(&rows[1], "missing"), "");
    }
}
