//! Per-partner-program error log files.
//!
//! Each log file is a fully quoted CSV in [`LOG_COLUMNS`] order. An append
//! reads the file, decides whether the failure was already reported, and
//! writes the file back with the new record at the end. Appends to the same
//! (partner, program) are serialized within the process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use datahub_ingest::{ObjectStore, decode_text};
use datahub_model::{DedupStrategy, LOG_COLUMNS, LogRecord};

use crate::error::{ReportError, Result};

const DESCRIPTION: usize = 6;
const FILE_NAME: usize = 9;
const ERROR_CODE: usize = 0;

type LockKey = (String, String);

/// Log files in the logs bucket.
pub struct LogStore<'a> {
    store: &'a dyn ObjectStore,
    bucket: String,
    dedup: DedupStrategy,
    locks: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

impl<'a> LogStore<'a> {
    pub fn new(store: &'a dyn ObjectStore, bucket: &str, dedup: DedupStrategy) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
            dedup,
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, partner: &str, program: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            locks
                .entry((partner.to_string(), program.to_string()))
                .or_default(),
        )
    }

    /// Append a record to its log file.
    ///
    /// Sets `record.send_email` and returns it: `true` for a failure not seen
    /// in the file before, `false` for a repeat.
    pub fn append(&self, record: &mut LogRecord) -> Result<bool> {
        let lock = self.lock_for(&record.partner, &record.program);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut rows = self.read_rows(&record.log_file_path)?;
        let repeat = rows.iter().any(|row| self.is_repeat(row, record));
        record.send_email = !repeat;
        rows.push(record.to_row());

        let bytes = write_rows(&rows)?;
        self.store
            .put_object(&self.bucket, &record.log_file_path, &bytes)?;
        tracing::info!(
            log = %record.log_file_path,
            error_code = record.error_code.code(),
            records = rows.len(),
            notify = record.send_email,
            "log appended"
        );
        Ok(record.send_email)
    }

    /// Rows of an existing log in [`LOG_COLUMNS`] order; empty when absent.
    pub fn read_rows(&self, path: &str) -> Result<Vec<Vec<String>>> {
        let Some(bytes) = self.store.get_optional(&self.bucket, path)? else {
            return Ok(Vec::new());
        };
        let read_error = |source| ReportError::ReadLog {
            path: path.to_string(),
            source,
        };
        let text = decode_text(&bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = reader.headers().map_err(read_error)?.clone();
        let positions: Vec<Option<usize>> = LOG_COLUMNS
            .iter()
            .map(|column| headers.iter().position(|header| header.trim() == *column))
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(read_error)?;
            rows.push(
                positions
                    .iter()
                    .map(|position| {
                        position
                            .and_then(|index| record.get(index))
                            .unwrap_or_default()
                            .to_string()
                    })
                    .collect(),
            );
        }
        Ok(rows)
    }

    fn is_repeat(&self, row: &[String], record: &LogRecord) -> bool {
        match self.dedup {
            DedupStrategy::Description => row[DESCRIPTION] == record.description,
            DedupStrategy::CodeAndFile => {
                row[ERROR_CODE] == record.error_code.to_string()
                    && row[FILE_NAME] == record.file_name
            }
        }
    }
}

fn write_rows(rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(LOG_COLUMNS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| ReportError::Csv(err.into_error().into()))
}
