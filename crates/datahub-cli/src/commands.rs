use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use datahub_ingest::{LocalObjectStore, TriggerEvent};
use datahub_metadata::{Metadata, load_metadata};
use datahub_model::DatahubConfig;
use datahub_report::{Notifier, OutboxNotifier, TracingNotifier};

use datahub_cli::pipeline::{Pipeline, ProcessOutcome, ScheduleAlert};

use crate::cli::{ScheduleArgs, ValidateArgs};

pub fn run_validate(args: &ValidateArgs, config: &DatahubConfig) -> Result<ProcessOutcome> {
    let store = LocalObjectStore::new(&config.storage.root);
    let metadata = load_metadata(&store, config).context("load metadata")?;
    let notifier = notifier(config);
    let pipeline = Pipeline::new(&store, config, &metadata, notifier.as_ref());
    let now = Utc::now();

    let outcome = match (&args.event, &args.key) {
        (Some(event), _) => {
            let text = event_text(event)?;
            pipeline.process_json(&text, now)?
        }
        (None, Some(key)) => {
            let bucket = args
                .bucket
                .as_deref()
                .unwrap_or(&config.storage.partner_bucket);
            pipeline.process_event(&TriggerEvent::new(bucket, key), now)?
        }
        (None, None) => anyhow::bail!("either --event or --key is required"),
    };
    Ok(outcome)
}

pub fn run_check_schedule(args: &ScheduleArgs, config: &DatahubConfig) -> Result<Vec<ScheduleAlert>> {
    let store = LocalObjectStore::new(&config.storage.root);
    let metadata = load_metadata(&store, config).context("load metadata")?;
    let notifier = notifier(config);
    let pipeline = Pipeline::new(&store, config, &metadata, notifier.as_ref());
    let now: DateTime<Utc> = args.time.unwrap_or_else(Utc::now);
    Ok(pipeline.check_schedule(now)?)
}

pub fn run_metadata(config: &DatahubConfig) -> Result<Metadata> {
    let store = LocalObjectStore::new(&config.storage.root);
    load_metadata(&store, config).context("load metadata")
}

fn notifier(config: &DatahubConfig) -> Box<dyn Notifier> {
    match &config.email.outbox {
        Some(dir) => Box::new(OutboxNotifier::new(dir)),
        None => Box::new(TracingNotifier),
    }
}

/// Inline JSON, or the contents of the named file.
fn event_text(value: &str) -> Result<String> {
    if value.trim_start().starts_with('{') {
        return Ok(value.to_string());
    }
    let path = Path::new(value);
    fs::read_to_string(path).with_context(|| format!("read event {}", path.display()))
}
