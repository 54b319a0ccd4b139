//! Shared fixtures for validation tests.

#![allow(dead_code)]

use datahub_ingest::{CsvTable, IngestError, read_csv_table};
use datahub_metadata::{Metadata, parse_metadata};
use datahub_model::{FileIdentity, FileValidation, ValidationSettings};
use datahub_validate::{identify, validate};

pub const SCHEMA: &str = "\
partner,program,folder,file,field,data_type,length,mandatory_values,unique_pk,row_id
test,degree,enrollments,terms,term_id,INT,,,0,1
test,degree,enrollments,terms,term_name,,,,0,2
test,degree,enrollments,terms,term_start,DATE,,,0,3
test,degree,enrollments,terms,term_type,VARCHAROPTNS,,\"['Fall','Spring']\",0,4
test,degree,enrollments,degree_program_memberships,student_id,,,,1,10
test,degree,enrollments,degree_program_memberships,admit_term_id,,,,1,11
test,degree,enrollments,degree_program_memberships,email,,,,0,12
test,degree,applications,applications,application_id,INT,,,1,20
test,degree,applications,applications,applied_at,TIMESTAMP,,,0,21
";

pub const RULES: &str = "\
file,field,data_type,length,mandatory_values,pk
terms,term_id,INT,,,1
terms,term_name,VARCHAR1,,,0
terms,term_start,DATE,,,0
terms,term_type,VARCHAR3,,,0
degree_program_memberships,student_id,INT,,,0
degree_program_memberships,admit_term_id,VARCHAR1,,,0
degree_program_memberships,email,EMAIL2,,,0
applications,application_id,INT,,,1
applications,applied_at,TIMESTAMP,,,0
";

pub const SCHEDULE: &str = "\
partner,run_hour,programs,internal_emails,partner_emails,ignore_files,swap_files
test,\"09:00,15:00\",degree,ops@coursera.org,data@test.edu;registrar@test.edu,nan,nan
";

pub fn metadata() -> Metadata {
    metadata_with_schedule(SCHEDULE)
}

pub fn metadata_with_schedule(schedule: &str) -> Metadata {
    parse_metadata(SCHEMA.as_bytes(), RULES.as_bytes(), schedule.as_bytes()).unwrap()
}

pub fn segments(key: &str) -> Vec<String> {
    key.split('/').map(str::to_lowercase).collect()
}

pub fn identity(metadata: &Metadata, key: &str) -> FileIdentity {
    identify(&segments(key), metadata, &ValidationSettings::default())
        .unwrap_or_else(|| panic!("{key} should be in scope"))
}

/// Validate CSV text as the content of `key`.
pub fn run(metadata: &Metadata, key: &str, csv: &str) -> FileValidation {
    let identity = identity(metadata, key);
    validate(&identity, metadata, &ValidationSettings::default(), || {
        read_csv_table(csv.as_bytes())
    })
}

pub fn unreachable_load() -> Result<CsvTable, IngestError> {
    panic!("file must not be read")
}
