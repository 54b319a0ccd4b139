//! Daily arrival check.
//!
//! At each partner's scheduled run hours the expected files of the day are
//! compared with what landed in the partner bucket.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use datahub_ingest::{ObjectStore, StorageError};
use datahub_metadata::Metadata;
use datahub_model::{FolderKind, MissingFiles, PartnerSchedule, ValidationSettings};

fn scope_applies(scope: &str, program: &str, folder: FolderKind) -> bool {
    scope == program || scope == folder.as_str()
}

/// Logical name a partner uses for a recognized file in one program.
fn delivered_name(schedule: &PartnerSchedule, program: &str, name: &str) -> String {
    let folder = FolderKind::for_logical_name(name);
    schedule
        .swap_files
        .iter()
        .filter(|(scope, _)| scope_applies(scope, program, folder))
        .flat_map(|(_, swaps)| swaps)
        .find(|swap| swap.from == name)
        .map_or_else(|| name.to_string(), |swap| swap.to.clone())
}

fn is_ignored(schedule: &PartnerSchedule, program: &str, folder: FolderKind, name: &str) -> bool {
    schedule
        .ignore_files
        .iter()
        .filter(|(scope, _)| scope_applies(scope, program, folder))
        .any(|(_, files)| files.iter().any(|file| file == name))
}

/// Object keys a partner program should deliver for `date_stamp` (yyyymmdd).
pub fn expected_keys(
    schedule: &PartnerSchedule,
    program: &str,
    date_stamp: &str,
    settings: &ValidationSettings,
) -> Vec<String> {
    settings
        .recognized_files
        .iter()
        .filter_map(|name| {
            let folder = FolderKind::for_logical_name(name);
            let delivered = delivered_name(schedule, program, name);
            if is_ignored(schedule, program, folder, name)
                || is_ignored(schedule, program, folder, &delivered)
            {
                return None;
            }
            Some(format!(
                "{}/{program}/{folder}/{delivered}_{date_stamp}.csv",
                schedule.partner
            ))
        })
        .collect()
}

/// Compare expected and delivered files for every partner scheduled at `now`.
pub fn check_schedule(
    store: &dyn ObjectStore,
    bucket: &str,
    metadata: &Metadata,
    settings: &ValidationSettings,
    now: DateTime<Utc>,
) -> Result<Vec<MissingFiles>, StorageError> {
    let time_check = now.format("%H:%M").to_string();
    let date_stamp = now.format("%Y%m%d").to_string();
    let mut reports = Vec::new();

    for schedule in metadata.schedules() {
        if !schedule.run_hours.contains(&time_check) {
            continue;
        }
        let expected: BTreeSet<String> = schedule
            .programs
            .iter()
            .flat_map(|program| expected_keys(schedule, program, &date_stamp, settings))
            .collect();
        let delivered: BTreeSet<String> = store
            .list_keys(bucket, &format!("{}/", schedule.partner))?
            .into_iter()
            .map(|key| key.to_lowercase())
            .collect();
        let files: Vec<String> = expected.difference(&delivered).cloned().collect();

        tracing::info!(
            partner = %schedule.partner,
            %time_check,
            expected = expected.len(),
            missing = files.len(),
            "schedule check"
        );
        if !files.is_empty() {
            reports.push(MissingFiles {
                partner: schedule.partner.clone(),
                time_check: time_check.clone(),
                files,
                partner_emails: schedule.partner_emails.clone(),
                internal_emails: schedule.internal_emails.clone(),
            });
        }
    }
    Ok(reports)
}
