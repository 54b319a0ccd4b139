//! Tests for the daily arrival check.

mod common;

use chrono::{TimeZone, Utc};
use common::{metadata, metadata_with_schedule};
use datahub_ingest::MemoryObjectStore;
use datahub_model::ValidationSettings;
use datahub_validate::{check_schedule, expected_keys};

const BUCKET: &str = "partners";

#[test]
fn expected_keys_apply_swaps_and_ignores() {
    let metadata = metadata_with_schedule(
        "partner,run_hour,programs,internal_emails,partner_emails,ignore_files,swap_files\n\
         test,09:00,degree,nan,nan,degree:students,\"enrollments:terms,degree_terms\"\n",
    );
    let schedule = metadata.schedule_for("test").unwrap();
    let keys = expected_keys(schedule, "degree", "20200128", &ValidationSettings::default());

    assert_eq!(keys.len(), 7);
    assert!(keys.contains(&"test/degree/applications/applications_20200128.csv".to_string()));
    assert!(keys.contains(&"test/degree/enrollments/degree_terms_20200128.csv".to_string()));
    assert!(!keys.iter().any(|key| key.contains("/terms_")));
    assert!(!keys.iter().any(|key| key.contains("students")));
}

#[test]
fn reports_missing_files_at_run_hour() {
    let metadata = metadata();
    let store = MemoryObjectStore::new()
        .with_object(BUCKET, "test/degree/enrollments/terms_20200128.csv", "a\n1\n")
        .with_object(BUCKET, "test/degree/applications/applications_20200128.csv", "a\n1\n")
        .with_object(BUCKET, "test/degree/enrollments/students_20200127.csv", "a\n1\n");
    let now = Utc.with_ymd_and_hms(2020, 1, 28, 9, 0, 0).unwrap();

    let reports = check_schedule(
        &store,
        BUCKET,
        &metadata,
        &ValidationSettings::default(),
        now,
    )
    .unwrap();

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.partner, "test");
    assert_eq!(report.time_check, "09:00");
    assert_eq!(report.files.len(), 6);
    assert!(report.files.contains(&"test/degree/enrollments/students_20200128.csv".to_string()));
    assert!(!report.files.iter().any(|key| key.contains("/terms_")));
    assert_eq!(report.partner_emails, "data@test.edu;registrar@test.edu");
}

#[test]
fn skips_partners_outside_their_run_hours() {
    let metadata = metadata();
    let store = MemoryObjectStore::new();
    let now = Utc.with_ymd_and_hms(2020, 1, 28, 10, 0, 0).unwrap();
    let reports = check_schedule(
        &store,
        BUCKET,
        &metadata,
        &ValidationSettings::default(),
        now,
    )
    .unwrap();
    assert!(reports.is_empty());
}
