//! Alert emails.
//!
//! Delivery is external: a [`Notifier`] hands a composed [`EmailMessage`] to
//! whatever transport is configured. Two implementations ship here, one that
//! logs the message and one that drops it as JSON into an outbox directory.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use datahub_model::{EmailSettings, LogRecord, MissingFiles};
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

/// A plaintext alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub reply_to: String,
    pub to: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Alert for a logged validation failure: partner recipients in `to`,
    /// internal recipients in `bcc`.
    pub fn for_failure(record: &LogRecord, settings: &EmailSettings) -> Self {
        let subject = format!(
            "{}: {} Data Exchange Automated Alert: Please review file: {} for Degree Program: {}",
            record.priority, settings.organization, record.file_name, record.program
        );
        let mut details = format!(
            "Logs for Partner: {}: Degree Program: {}: {}",
            record.partner, record.program, record.file_name
        );
        if let Some(rows) = record.file_no_of_rows.filter(|rows| *rows > 0) {
            let _ = write!(details, ": Number of Rows: {rows}");
        }
        details.push_str(&record.description);
        Self::new(
            settings,
            &record.partner_emails,
            &record.internal_emails,
            subject,
            &details,
        )
    }

    /// Alert for files not delivered by a scheduled check.
    pub fn for_missing_files(report: &MissingFiles, settings: &EmailSettings) -> Self {
        let subject = format!(
            "{} Data Exchange Automated Alert: Files not received for {}",
            settings.organization, report.partner
        );
        let mut details = format!(
            "Time Check: {} (UTC): Reminder: Files not sent for {}",
            report.time_check, report.partner
        );
        for file in &report.files {
            details.push_str("\n\t\t");
            details.push_str(file);
        }
        Self::new(
            settings,
            &report.partner_emails,
            &report.internal_emails,
            subject,
            &details,
        )
    }

    fn new(
        settings: &EmailSettings,
        partner_emails: &str,
        internal_emails: &str,
        subject: String,
        details: &str,
    ) -> Self {
        Self {
            from: settings.from.clone(),
            reply_to: settings.reply_to.clone(),
            to: split_recipients(partner_emails),
            bcc: split_recipients(internal_emails),
            subject,
            body: body(settings, details),
        }
    }

    pub fn has_recipients(&self) -> bool {
        !self.to.is_empty() || !self.bcc.is_empty()
    }
}

fn body(settings: &EmailSettings, details: &str) -> String {
    let organization = &settings.organization;
    format!(
        "\n\nThank you for your partnership in data exchange with {organization}.\n\
         Please review the below issue(s) to ensure our platform can achieve our target \
         reliability goals for this program:\n\n\
         {details}\
         \n\nThis email is not monitored. For any questions relating to Datahub, \
         please email your {organization} Partner Product Specialist.\n\
         If you're not sure who that is, please reach out to {} to find your \
         Partner Product Specialist.",
        settings.support_address
    )
}

/// Split a `;`-delimited recipient list.
///
/// Lists of three characters or fewer are placeholders and yield nobody.
pub fn split_recipients(list: &str) -> Vec<String> {
    let list = list.trim();
    if list.len() <= 3 {
        return Vec::new();
    }
    list.split(';')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sends alert messages.
pub trait Notifier {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Writes messages to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            to = ?message.to,
            bcc = ?message.bcc,
            subject = %message.subject,
            "alert email"
        );
        tracing::debug!(body = %message.body, "alert email body");
        Ok(())
    }
}

/// Writes each message as a JSON file for a mail relay to pick up.
#[derive(Debug)]
pub struct OutboxNotifier {
    dir: PathBuf,
    sequence: AtomicUsize,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicUsize::new(0),
        }
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| ReportError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let path = self.dir.join(format!(
            "{}-{sequence:04}.json",
            Utc::now().format("%Y%m%dT%H%M%S%.6f")
        ));
        let json = serde_json::to_vec_pretty(message)?;
        fs::write(&path, json).map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), subject = %message.subject, "alert written to outbox");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::LogComposer;
    use datahub_model::{FileIdentity, LogSettings, PartnerSchedule, ValidationFailure};

    #[test]
    fn placeholder_lists_have_no_recipients() {
        assert!(split_recipients("").is_empty());
        assert!(split_recipients("nan").is_empty());
        assert_eq!(
            split_recipients("a@x.org; b@x.org;"),
            vec!["a@x.org", "b@x.org"]
        );
    }

    #[test]
    fn failure_message_reports_row_count() {
        let identity = FileIdentity::from_segments(&[
            "test".into(),
            "degree".into(),
            "enrollments".into(),
            "terms_20200129.csv".into(),
        ])
        .unwrap();
        let schedule = PartnerSchedule {
            partner: "test".into(),
            partner_emails: "data@test.edu".into(),
            ..PartnerSchedule::default()
        };
        let settings = LogSettings::default();
        let record = LogComposer::new(&settings, Utc::now()).compose(
            &identity,
            &ValidationFailure::EmptyFile,
            Some(2),
            Some(&schedule),
        );

        let message = EmailMessage::for_failure(&record, &EmailSettings::default());

        assert!(message.body.contains(
            "Logs for Partner: test: Degree Program: degree: terms_20200129.csv: Number of Rows: 2: empty file sent"
        ));
        assert_eq!(message.to, vec!["data@test.edu"]);
        assert!(message.bcc.is_empty());
    }

    #[test]
    fn missing_files_message() {
        let report = MissingFiles {
            partner: "test".into(),
            time_check: "09:00".into(),
            files: vec![
                "test/degree/enrollments/students_20200128.csv".into(),
                "test/degree/enrollments/terms_20200128.csv".into(),
            ],
            partner_emails: "data@test.edu".into(),
            internal_emails: String::new(),
        };
        let message = EmailMessage::for_missing_files(&report, &EmailSettings::default());
        assert_eq!(
            message.subject,
            "Coursera Data Exchange Automated Alert: Files not received for test"
        );
        assert!(message.body.contains(
            "Time Check: 09:00 (UTC): Reminder: Files not sent for test\n\t\ttest/degree/enrollments/students_20200128.csv\n\t\ttest/degree/enrollments/terms_20200128.csv\n\n"
        ));
        assert_eq!(message.to, vec!["data@test.edu"]);
        assert!(message.bcc.is_empty());
    }
}
