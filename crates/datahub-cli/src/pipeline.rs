//! Event processing.
//!
//! One trigger event flows through identity parsing, validation, log
//! composition, the deduplicating log store and, for new failures, the
//! notifier. The schedule check shares the same context.

use chrono::{DateTime, Utc};
use datahub_ingest::{IngestError, ObjectStore, StorageError, TriggerEvent};
use datahub_metadata::Metadata;
use datahub_model::{DatahubConfig, FileIdentity, LogRecord, MissingFiles, ValidationOutcome};
use datahub_report::{EmailMessage, LogComposer, LogStore, Notifier, ReportError};
use datahub_validate::{check_schedule, identify, validate_object};
use thiserror::Error;
use tracing::{info, info_span, warn};

/// What happened to one trigger event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The key is not a partner file handled here.
    OutOfScope,
    Success {
        identity: FileIdentity,
        row_count: Option<usize>,
    },
    /// A check failed and the failure was logged.
    Failed { record: LogRecord, notified: bool },
    /// The object could not be fetched from storage. Nothing is logged.
    Unreadable {
        identity: FileIdentity,
        reason: String,
    },
}

impl ProcessOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ProcessOutcome::OutOfScope => "Out of scope",
            ProcessOutcome::Success { .. } => "Success",
            ProcessOutcome::Failed { .. } => "Failed",
            ProcessOutcome::Unreadable { .. } => "Unreadable",
        }
    }
}

/// A missing-files report and whether its alert went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleAlert {
    pub missing: MissingFiles,
    pub notified: bool,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The trigger event lacks required keys. An integration bug, not a data
    /// problem.
    #[error("malformed trigger event: {0}")]
    MalformedEvent(#[source] IngestError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Shared context for processing events within one run.
pub struct Pipeline<'a> {
    store: &'a dyn ObjectStore,
    config: &'a DatahubConfig,
    metadata: &'a Metadata,
    notifier: &'a dyn Notifier,
    logs: LogStore<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        store: &'a dyn ObjectStore,
        config: &'a DatahubConfig,
        metadata: &'a Metadata,
        notifier: &'a dyn Notifier,
    ) -> Self {
        let logs = LogStore::new(store, &config.storage.logs_bucket, config.logs.dedup);
        Self {
            store,
            config,
            metadata,
            notifier,
            logs,
        }
    }

    /// Parse a JSON trigger event and process it.
    pub fn process_json(
        &self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<ProcessOutcome, PipelineError> {
        let event = TriggerEvent::from_json(text).map_err(PipelineError::MalformedEvent)?;
        self.process_event(&event, now)
    }

    /// Validate the object named by `event`, log a failure and alert on new
    /// failures.
    pub fn process_event(
        &self,
        event: &TriggerEvent,
        now: DateTime<Utc>,
    ) -> Result<ProcessOutcome, PipelineError> {
        let span = info_span!("event", bucket = %event.bucket(), key = %event.key());
        let _guard = span.enter();

        let Some(identity) = identify(
            &event.key_segments(),
            self.metadata,
            &self.config.validation,
        ) else {
            info!("event out of scope");
            return Ok(ProcessOutcome::OutOfScope);
        };

        let validation = validate_object(
            self.store,
            event.bucket(),
            event.key(),
            &identity,
            self.metadata,
            &self.config.validation,
        );
        let failure = match validation.outcome {
            ValidationOutcome::Success => {
                info!(file = %identity.file_path(), rows = ?validation.row_count, "file valid");
                return Ok(ProcessOutcome::Success {
                    identity,
                    row_count: validation.row_count,
                });
            }
            ValidationOutcome::Unreadable { reason } => {
                return Ok(ProcessOutcome::Unreadable { identity, reason });
            }
            ValidationOutcome::Failed(failure) => failure,
        };

        let schedule = self.metadata.schedule_for(&identity.partner);
        if schedule.is_none() {
            warn!(partner = %identity.partner, "partner has no schedule entry, no recipients");
        }
        let mut record = LogComposer::new(&self.config.logs, now).compose(
            &identity,
            &failure,
            validation.row_count,
            schedule,
        );
        info!(
            file = %record.file_path,
            error_code = record.error_code.code(),
            priority = %record.priority,
            "validation failed"
        );
        let is_new = self.logs.append(&mut record)?;
        let notified =
            is_new && self.notify(&EmailMessage::for_failure(&record, &self.config.email));
        Ok(ProcessOutcome::Failed { record, notified })
    }

    /// Run the daily arrival check for `now` and alert each partner with
    /// missing files.
    pub fn check_schedule(&self, now: DateTime<Utc>) -> Result<Vec<ScheduleAlert>, PipelineError> {
        let reports = check_schedule(
            self.store,
            &self.config.storage.partner_bucket,
            self.metadata,
            &self.config.validation,
            now,
        )?;
        Ok(reports
            .into_iter()
            .map(|missing| {
                let message = EmailMessage::for_missing_files(&missing, &self.config.email);
                let notified = self.notify(&message);
                ScheduleAlert { missing, notified }
            })
            .collect())
    }

    /// Hand a message to the notifier. Send failures are logged, not
    /// propagated.
    fn notify(&self, message: &EmailMessage) -> bool {
        if !message.has_recipients() {
            warn!(subject = %message.subject, "alert has no recipients");
            return false;
        }
        match self.notifier.send(message) {
            Ok(()) => true,
            Err(error) => {
                tracing::error!(%error, subject = %message.subject, "alert not sent");
                false
            }
        }
    }
}
