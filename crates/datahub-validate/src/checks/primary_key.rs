//! Primary key uniqueness check (error code 5).

use std::collections::BTreeMap;

use datahub_ingest::CsvTable;
use datahub_metadata::ScopedMetadata;
use datahub_model::{DuplicateKey, PkViolations, ValidationFailure};

use super::CheckResult;

/// Rows must not repeat a primary-key tuple.
///
/// Rows with a missing key component are not counted. A file without a
/// declared key passes.
pub fn check(table: &CsvTable, scoped: &ScopedMetadata<'_>) -> CheckResult {
    let columns = scoped.pk_columns();
    if columns.is_empty() {
        tracing::debug!(schema = %scoped.key(), "no primary key declared");
        return Ok(());
    }
    let mut indices = Vec::with_capacity(columns.len());
    for column in &columns {
        let Some(index) = table.column_index(column) else {
            tracing::warn!(schema = %scoped.key(), %column, "primary key column absent, skipping check");
            return Ok(());
        };
        indices.push(index);
    }

    let duplicates = duplicate_keys(table, &indices);
    if duplicates.is_empty() {
        return Ok(());
    }
    Err(ValidationFailure::PkViolation {
        violations: PkViolations {
            columns,
            duplicates,
        },
    })
}

/// Key tuples occurring more than once, sorted by key.
fn duplicate_keys(table: &CsvTable, indices: &[usize]) -> Vec<DuplicateKey> {
    let mut counts: BTreeMap<Vec<String>, usize> = BTreeMap::new();
    for row in &table.rows {
        let key: Option<Vec<String>> = indices
            .iter()
            .map(|index| row.get(*index).cloned().flatten())
            .collect();
        if let Some(key) = key {
            *counts.entry(key).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(values, count)| DuplicateKey { values, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use datahub_ingest::read_csv_table;

    #[test]
    fn counts_duplicates_and_skips_missing_keys() {
        let table = read_csv_table(
            b"student_id,admit_term_id,name\n1,t1,a\n1,t1,b\n2,t1,c\n2,,d\n2,,e\n3,t2,f\n3,t2,g\n3,t2,h\n",
        )
        .unwrap();
        let duplicates = duplicate_keys(&table, &[0, 1]);
        assert_eq!(
            duplicates,
            vec![
                DuplicateKey {
                    values: vec!["1".into(), "t1".into()],
                    count: 2
                },
                DuplicateKey {
                    values: vec!["3".into(), "t2".into()],
                    count: 3
                },
            ]
        );
    }
}
