//! Partner overrides: file swaps and ignored files.
//!
//! Both overrides are stored in the partner schedule as
//! `scope:items|scope2:items`. For swaps the items are `old,new` pairs joined by
//! `;`; for ignores they are logical names joined by `,`. The scope names a
//! program slug, or a folder to apply the override to every program of the
//! partner.

use std::collections::{BTreeMap, HashSet};

use datahub_model::{FieldRule, FileSwap, MetadataRow, PartnerSchedule};

use crate::error::{MetadataError, Result};

fn clean(spec: &str) -> String {
    spec.chars()
        .filter(|ch| *ch != '\\' && !ch.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

fn is_unset(spec: &str) -> bool {
    spec.is_empty() || spec == "nan"
}

fn malformed(partner: &str, column: &str, spec: &str) -> MetadataError {
    MetadataError::MalformedOverride {
        partner: partner.to_string(),
        column: column.to_string(),
        spec: spec.to_string(),
    }
}

/// Parse a `swap_files` cell.
pub fn parse_swap_spec(partner: &str, spec: &str) -> Result<BTreeMap<String, Vec<FileSwap>>> {
    let cleaned = clean(spec);
    let mut swaps: BTreeMap<String, Vec<FileSwap>> = BTreeMap::new();
    if is_unset(&cleaned) {
        return Ok(swaps);
    }
    for section in cleaned.split('|').filter(|section| !section.is_empty()) {
        let (scope, pairs) = section
            .split_once(':')
            .filter(|(scope, _)| !scope.is_empty())
            .ok_or_else(|| malformed(partner, "swap_files", spec))?;
        for pair in pairs.split(';').filter(|pair| !pair.is_empty()) {
            let swap = pair
                .split_once(',')
                .filter(|(from, to)| !from.is_empty() && !to.is_empty() && !to.contains(','))
                .map(|(from, to)| FileSwap {
                    from: from.to_string(),
                    to: to.to_string(),
                })
                .ok_or_else(|| malformed(partner, "swap_files", spec))?;
            swaps.entry(scope.to_string()).or_default().push(swap);
        }
    }
    Ok(swaps)
}

/// Parse an `ignore_files` cell.
pub fn parse_ignore_spec(partner: &str, spec: &str) -> Result<BTreeMap<String, Vec<String>>> {
    let cleaned = clean(spec);
    let mut ignores: BTreeMap<String, Vec<String>> = BTreeMap::new();
    if is_unset(&cleaned) {
        return Ok(ignores);
    }
    for section in cleaned.split('|').filter(|section| !section.is_empty()) {
        let (scope, files) = section
            .split_once(':')
            .filter(|(scope, _)| !scope.is_empty())
            .ok_or_else(|| malformed(partner, "ignore_files", spec))?;
        let entry = ignores.entry(scope.to_string()).or_default();
        entry.extend(
            files
                .split(',')
                .filter(|file| !file.is_empty())
                .map(str::to_string),
        );
    }
    Ok(ignores)
}

fn scope_matches(scope: &str, program: &str, folder: &str) -> bool {
    scope == program || scope == folder
}

/// Rename schema rows of each partner according to its swaps.
///
/// Returns the number of rows renamed.
pub fn apply_schema_swaps(rows: &mut [MetadataRow], schedules: &[PartnerSchedule]) -> usize {
    let mut renamed = 0;
    for schedule in schedules {
        for (scope, swaps) in &schedule.swap_files {
            for swap in swaps {
                for row in rows.iter_mut().filter(|row| {
                    row.partner == schedule.partner
                        && scope_matches(scope, &row.program, &row.folder)
                        && row.file == swap.from
                }) {
                    row.file.clone_from(&swap.to);
                    renamed += 1;
                }
            }
        }
    }
    if renamed > 0 {
        tracing::debug!(renamed, "applied file swaps to schema rows");
    }
    renamed
}

/// Add field rules for swapped file names.
///
/// Field rules are shared by every partner, so a swap copies the rules of the
/// original file under the new name instead of renaming them.
pub fn apply_rule_swaps(rules: &mut Vec<FieldRule>, schedules: &[PartnerSchedule]) -> usize {
    let mut known: HashSet<(String, String)> = rules
        .iter()
        .map(|rule| (rule.file.clone(), rule.field.clone()))
        .collect();
    let mut added = Vec::new();
    for swap in schedules
        .iter()
        .flat_map(|schedule| schedule.swap_files.values())
        .flatten()
    {
        for rule in rules.iter().filter(|rule| rule.file == swap.from) {
            if known.insert((swap.to.clone(), rule.field.clone())) {
                let mut copy = rule.clone();
                copy.file.clone_from(&swap.to);
                added.push(copy);
            }
        }
    }
    let count = added.len();
    rules.extend(added);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_swap_spec() {
        let swaps =
            parse_swap_spec("test", r"degree:terms,degree_terms;students,learners|mba:terms\,sessions")
                .unwrap();
        assert_eq!(swaps.len(), 2);
        assert_eq!(
            swaps["degree"],
            vec![
                FileSwap {
                    from: "terms".into(),
                    to: "degree_terms".into()
                },
                FileSwap {
                    from: "students".into(),
                    to: "learners".into()
                },
            ]
        );
        assert_eq!(swaps["mba"][0].to, "sessions");
    }

    #[test]
    fn unset_specs_are_empty() {
        assert!(parse_swap_spec("test", "").unwrap().is_empty());
        assert!(parse_swap_spec("test", "nan").unwrap().is_empty());
        assert!(parse_ignore_spec("test", " NaN ").unwrap().is_empty());
    }

    #[test]
    fn malformed_specs_are_errors() {
        for spec in ["terms,degree_terms", "degree:terms", ":terms,x", "degree:a,b,c"] {
            let err = parse_swap_spec("test", spec).unwrap_err();
            assert!(
                matches!(err, MetadataError::MalformedOverride { .. }),
                "{spec}"
            );
        }
        assert!(parse_ignore_spec("test", "students").is_err());
    }

    #[test]
    fn parses_ignore_spec() {
        let ignores = parse_ignore_spec("test", "degree:students, degree_courses|mba:terms").unwrap();
        assert_eq!(ignores["degree"], vec!["students", "degree_courses"]);
        assert_eq!(ignores["mba"], vec!["terms"]);
    }
}
