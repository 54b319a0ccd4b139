//! Turning a validation failure into a log record.

use chrono::{DateTime, Utc};
use datahub_model::{
    FileIdentity, LogRecord, LogSettings, PartnerSchedule, ValidationFailure, is_blank,
};

use crate::description::describe;

/// Builds log records for one run.
///
/// The run timestamp fixes both the record's `date_time` and the daily log
/// file it is appended to.
#[derive(Debug, Clone)]
pub struct LogComposer<'a> {
    settings: &'a LogSettings,
    now: DateTime<Utc>,
}

impl<'a> LogComposer<'a> {
    pub fn new(settings: &'a LogSettings, now: DateTime<Utc>) -> Self {
        Self { settings, now }
    }

    /// `datahub_logs_{partner}_{program}_log_{yyyymmdd}.csv`
    pub fn log_file_name(&self, partner: &str, program: &str) -> String {
        format!(
            "datahub_logs_{partner}_{program}_log_{}.csv",
            self.now.format("%Y%m%d")
        )
    }

    /// Log file key in the logs bucket, partitioned by partner and program.
    pub fn log_file_path(&self, partner: &str, program: &str) -> String {
        format!(
            "{}/{partner}/{program}/{}",
            self.settings.root.trim_end_matches('/'),
            self.log_file_name(partner, program)
        )
    }

    pub fn compose(
        &self,
        identity: &FileIdentity,
        failure: &ValidationFailure,
        row_count: Option<usize>,
        schedule: Option<&PartnerSchedule>,
    ) -> LogRecord {
        let code = failure.error_code();
        let (supplied_fields, expected_fields, no_supplied_fields, no_expected_fields) =
            match failure {
                ValidationFailure::WrongFileStructure { supplied, expected } => (
                    supplied.join(","),
                    expected.join(","),
                    Some(supplied.len()),
                    Some(expected.len()),
                ),
                _ => (String::new(), String::new(), None, None),
            };
        let partner_emails = schedule
            .map(|schedule| clean_emails(&schedule.partner_emails))
            .unwrap_or_default();
        let internal_emails = schedule
            .map(|schedule| clean_emails(&schedule.internal_emails))
            .unwrap_or_default();

        LogRecord {
            error_code: code,
            error_type: code.error_type().to_string(),
            supplied_fields,
            expected_fields,
            no_supplied_fields,
            no_expected_fields,
            description: describe(failure, &identity.file_name, row_count),
            partner: identity.partner.clone(),
            program: identity.program.clone(),
            file_name: identity.file_name.clone(),
            file_path: identity.file_path(),
            file_no_of_rows: row_count,
            log_file_name: self.log_file_name(&identity.partner, &identity.program),
            log_file_path: self.log_file_path(&identity.partner, &identity.program),
            priority: code.priority(),
            partner_emails,
            internal_emails,
            send_email: true,
            date_time: self.now,
        }
    }
}

/// Collapse a `nan` or blank list to empty and trim the rest.
pub fn clean_emails(list: &str) -> String {
    if is_blank(list) {
        return String::new();
    }
    list.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use datahub_model::{ErrorCode, Priority};

    fn identity() -> FileIdentity {
        FileIdentity::from_segments(&[
            "test".into(),
            "degree".into(),
            "enrollments".into(),
            "terms_20200129.csv".into(),
        ])
        .unwrap()
    }

    fn schedule() -> PartnerSchedule {
        PartnerSchedule {
            partner: "test".into(),
            internal_emails: " ops@coursera.org ".into(),
            partner_emails: "nan".into(),
            ..PartnerSchedule::default()
        }
    }

    #[test]
    fn structure_failure_record() {
        let settings = LogSettings::default();
        let now = Utc.with_ymd_and_hms(2020, 1, 29, 14, 5, 0).unwrap();
        let composer = LogComposer::new(&settings, now);
        let failure = ValidationFailure::WrongFileStructure {
            supplied: vec!["term_id".into(), "term_name".into()],
            expected: vec!["term_id".into(), "term_name".into(), "term_start".into()],
        };

        let record = composer.compose(&identity(), &failure, Some(2), Some(&schedule()));

        assert_eq!(record.error_code, ErrorCode::WrongFileStructure);
        assert_eq!(record.error_type, "wrong file structure");
        assert_eq!(record.priority, Priority::Critical);
        assert_eq!(record.supplied_fields, "term_id,term_name");
        assert_eq!(record.no_expected_fields, Some(3));
        assert_eq!(record.file_path, "test/degree/enrollments/terms_20200129.csv");
        assert_eq!(record.file_no_of_rows, Some(2));
        assert_eq!(
            record.log_file_name,
            "datahub_logs_test_degree_log_20200129.csv"
        );
        assert_eq!(
            record.log_file_path,
            "datahub/datahub_validator/logs/test/degree/datahub_logs_test_degree_log_20200129.csv"
        );
        assert_eq!(record.partner_emails, "");
        assert_eq!(record.internal_emails, "ops@coursera.org");
        assert!(record.send_email);
    }

    #[test]
    fn missing_schedule_leaves_recipients_empty() {
        let settings = LogSettings::default();
        let composer = LogComposer::new(&settings, Utc::now());
        let record = composer.compose(&identity(), &ValidationFailure::EmptyFile, None, None);
        assert_eq!(record.partner_emails, "");
        assert_eq!(record.supplied_fields, "");
        assert_eq!(record.no_supplied_fields, None);
        assert_eq!(record.priority, Priority::Critical);
    }

    #[test]
    fn addresses_containing_nan_are_kept() {
        assert_eq!(clean_emails(" nan "), "");
        assert_eq!(
            clean_emails("finance@test.edu;nancy@x.org "),
            "finance@test.edu;nancy@x.org"
        );
    }
}
