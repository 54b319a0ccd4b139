//! End-to-end tests of the five-check pipeline.

mod common;

use common::{identity, metadata, metadata_with_schedule, run, segments, unreachable_load};
use datahub_ingest::{IngestError, StorageError};
use datahub_model::{
    ErrorCode, FieldExceptions, ValidationFailure, ValidationOutcome, ValidationSettings,
};
use datahub_validate::{identify, validate};

const TERMS_KEY: &str = "test/degree/enrollments/terms_20200128.csv";

fn failure(outcome: &ValidationOutcome) -> &ValidationFailure {
    outcome.failure().expect("validation failure")
}

#[test]
fn valid_file_passes_every_check() {
    let result = run(
        &metadata(),
        TERMS_KEY,
        "term_id,term_name,term_start,term_type\n1,Fall 2020,2020-09-01,Fall\n2,Spring 2021,2021-01-15,Spring\n",
    );
    assert_eq!(result.outcome, ValidationOutcome::Success);
    assert_eq!(result.row_count, Some(2));
}

#[test]
fn headers_are_case_insensitive() {
    let result = run(
        &metadata(),
        "Test/Degree/Enrollments/Terms_20200128.csv",
        "Term_ID,TERM_NAME,term_start,term_type\n1,Fall 2020,2020-09-01,Fall\n",
    );
    assert!(result.outcome.is_success());
}

#[test]
fn swapped_columns_fail_structure_check() {
    let result = run(
        &metadata(),
        TERMS_KEY,
        "term_name,term_id,term_start,term_type\nFall 2020,1,2020-09-01,Fall\n",
    );
    match failure(&result.outcome) {
        ValidationFailure::WrongFileStructure { supplied, expected } => {
            assert_eq!(supplied, &["term_name", "term_id", "term_start", "term_type"]);
            assert_eq!(expected, &["term_id", "term_name", "term_start", "term_type"]);
        }
        other => panic!("unexpected failure {other:?}"),
    }
    assert_eq!(result.row_count, Some(1));
}

#[test]
fn missing_column_fails_structure_check() {
    let result = run(
        &metadata(),
        "test/degree/enrollments/terms_20200129.csv",
        "term_id,term_name\n1,Fall 2020\n2,Spring 2021\n",
    );
    assert_eq!(
        failure(&result.outcome).error_code(),
        ErrorCode::WrongFileStructure
    );
    assert_eq!(result.row_count, Some(2));
}

#[test]
fn invalid_values_are_collected_per_field() {
    let result = run(
        &metadata(),
        TERMS_KEY,
        "term_id,term_name,term_start,term_type\nx1,Fall,2020-09-01,Fall\n2,NULL,01/15/2021,Winter\n3,,2021-05-01,Spring\n",
    );
    let ValidationFailure::WrongFieldDataTypes { exceptions } = failure(&result.outcome) else {
        panic!("expected a data type failure");
    };
    assert_eq!(
        exceptions,
        &[
            FieldExceptions {
                field: "term_id".into(),
                values: vec!["x1".into()],
            },
            FieldExceptions {
                field: "term_name".into(),
                values: vec!["null".into(), "null".into()],
            },
            FieldExceptions {
                field: "term_start".into(),
                values: vec!["01/15/2021".into()],
            },
            // the schema's option list overrides the rule's VARCHAR3
            FieldExceptions {
                field: "term_type".into(),
                values: vec!["Winter".into()],
            },
        ]
    );
}

#[test]
fn unusable_schema_type_falls_back_to_rule_pattern() {
    let schema = common::SCHEMA.replace(
        "terms,term_start,DATE,,,0,3",
        "terms,term_start,DATETIME,,,0,3",
    );
    let metadata = datahub_metadata::parse_metadata(
        schema.as_bytes(),
        common::RULES.as_bytes(),
        common::SCHEDULE.as_bytes(),
    )
    .unwrap();
    let result = run(
        &metadata,
        TERMS_KEY,
        "term_id,term_name,term_start,term_type\n1,Fall,2020/09/01,Fall\n",
    );
    let ValidationFailure::WrongFieldDataTypes { exceptions } = failure(&result.outcome) else {
        panic!("expected a data type failure");
    };
    assert_eq!(exceptions.len(), 1);
    assert_eq!(exceptions[0].field, "term_start");
}

#[test]
fn duplicate_primary_keys_are_reported() {
    let result = run(
        &metadata(),
        "test/degree/enrollments/degree_program_memberships_20200128.csv",
        "student_id,admit_term_id,email\n\
         1,t1,a@test.edu\n\
         1,t1,b@test.edu\n\
         2,t1,\n\
         2,t1,c@test.edu\n\
         3,t1,d@test.edu\n",
    );
    let ValidationFailure::PkViolation { violations } = failure(&result.outcome) else {
        panic!("expected a primary key failure");
    };
    assert_eq!(violations.columns, vec!["student_id", "admit_term_id"]);
    assert_eq!(violations.duplicates.len(), 2);
    assert_eq!(violations.total_duplicates(), 4);
    assert_eq!(result.row_count, Some(5));
}

#[test]
fn rule_primary_key_used_without_schema_flags() {
    let result = run(
        &metadata(),
        TERMS_KEY,
        "term_id,term_name,term_start,term_type\n1,Fall,2020-09-01,Fall\n1,Fall,2020-09-01,Fall\n",
    );
    let ValidationFailure::PkViolation { violations } = failure(&result.outcome) else {
        panic!("expected a primary key failure");
    };
    assert_eq!(violations.columns, vec!["term_id"]);
    assert_eq!(violations.total_duplicates(), 2);
}

#[test]
fn header_only_file_is_empty() {
    let result = run(&metadata(), TERMS_KEY, "term_id,term_name,term_start,term_type\n");
    assert_eq!(result.outcome, ValidationOutcome::Failed(ValidationFailure::EmptyFile));
    assert_eq!(result.row_count, None);
}

#[test]
fn empty_check_runs_before_structure_check() {
    let result = run(&metadata(), TERMS_KEY, "wrong,columns\n");
    assert_eq!(
        failure(&result.outcome).error_code(),
        ErrorCode::EmptyFile
    );
}

#[test]
fn bad_names_fail_without_reading_the_file() {
    let metadata = metadata();
    let settings = ValidationSettings::default();
    for key in [
        "test/degree/enrollments/terms_2020012.csv",
        "test/degree/enrollments/terms_20200128.txt",
        "test/degree/enrollments/terms_20200128.csv.gz",
        "test/degree/enrollments/term_20200128.csv",
        "test/degree/enrollments/students_20200128.csv",
        "test/degree/enrollments/terms.csv",
    ] {
        let identity = identity(&metadata, key);
        let result = validate(&identity, &metadata, &settings, unreachable_load);
        match &result.outcome {
            ValidationOutcome::Failed(ValidationFailure::WrongFileName { path }) => {
                assert_eq!(path, &segments(key), "{key}");
            }
            other => panic!("{key}: unexpected outcome {other:?}"),
        }
        assert_eq!(result.row_count, None);
    }
}

#[test]
fn unreadable_file_is_distinct_from_failure() {
    let metadata = metadata();
    let identity = identity(&metadata, TERMS_KEY);
    let result = validate(&identity, &metadata, &ValidationSettings::default(), || {
        Err(IngestError::Storage(StorageError::NotFound {
            bucket: "partners".into(),
            key: TERMS_KEY.into(),
        }))
    });
    assert!(matches!(result.outcome, ValidationOutcome::Unreadable { .. }));
    assert!(result.outcome.failure().is_none());
}

#[test]
fn ragged_row_fails_as_malformed_content() {
    let result = run(
        &metadata(),
        TERMS_KEY,
        "term_id,term_name,term_start,term_type\n1,Fall,2020-09-01,Fall,EXTRA\n",
    );
    assert_eq!(
        result.outcome,
        ValidationOutcome::Failed(ValidationFailure::MalformedContent {
            reason: "line 2 has 5 fields, header has 4".into(),
        })
    );
    assert_eq!(failure(&result.outcome).error_code(), ErrorCode::EmptyFile);
    assert_eq!(result.row_count, None);
}

#[test]
fn out_of_scope_keys_never_reach_the_pipeline() {
    let metadata = metadata();
    let settings = ValidationSettings::default();
    for key in [
        "other/degree/enrollments/unknown_20200128.csv",
        "test/mba/enrollments/terms_20200128.csv",
        "test/degree/enrollments/finance_metadata_20200128.csv",
        "test/degree/archive/terms_20200128.csv",
        "test/degree/enrollments/2020/terms_20200128.csv",
    ] {
        assert!(identify(&segments(key), &metadata, &settings).is_none(), "{key}");
    }
}

#[test]
fn swapped_file_validates_against_original_schema() {
    let metadata = metadata_with_schedule(
        "partner,run_hour,programs,internal_emails,partner_emails,ignore_files,swap_files\n\
         test,09:00,degree,nan,nan,nan,\"enrollments:terms,degree_terms\"\n",
    );
    let key = "test/degree/enrollments/degree_terms_20200128.csv";
    let result = run(
        &metadata,
        key,
        "term_id,term_name,term_start,term_type\n1,Fall 2020,2020-09-01,Fall\n",
    );
    assert_eq!(result.outcome, ValidationOutcome::Success);

    // the original name no longer has a schema for this partner
    let identity = identity(&metadata, TERMS_KEY);
    let result = validate(
        &identity,
        &metadata,
        &ValidationSettings::default(),
        unreachable_load,
    );
    assert_eq!(
        result.outcome.failure().map(ValidationFailure::error_code),
        Some(ErrorCode::WrongFileName)
    );
}

#[test]
fn timestamps_allow_missing_values() {
    let result = run(
        &metadata(),
        "test/degree/applications/applications_20200128.csv",
        "application_id,applied_at\n1,2020-01-28 10:00:00\n2,\n3,2020-01-28 10:00:00.250\n",
    );
    assert!(result.outcome.is_success());
}
