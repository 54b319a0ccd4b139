//! CLI argument definitions for the DataHub validator.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "datahub",
    version,
    about = "DataHub partner file validator",
    long_about = "Validate partner CSV deliveries against the DataHub metadata tables.\n\n\
                  Failures are appended to per-partner-program logs and new failures\n\
                  are sent to the partner and internal recipients."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file (defaults apply when omitted).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one delivered file.
    Validate(ValidateArgs),

    /// Report files not yet delivered at a scheduled check time.
    CheckSchedule(ScheduleArgs),

    /// Summarize the loaded metadata tables.
    Metadata,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Trigger event as inline JSON or a path to a JSON file.
    #[arg(
        long = "event",
        value_name = "JSON|PATH",
        conflicts_with = "key",
        required_unless_present = "key"
    )]
    pub event: Option<String>,

    /// Bucket holding the file (default: the configured partner bucket).
    #[arg(long = "bucket", value_name = "BUCKET", requires = "key")]
    pub bucket: Option<String>,

    /// Object key of the file, e.g. `partner/program/enrollments/terms_20200128.csv`.
    #[arg(long = "key", value_name = "KEY")]
    pub key: Option<String>,
}

#[derive(Parser)]
pub struct ScheduleArgs {
    /// Check time (default: now). Only the date and `HH:MM` are used.
    #[arg(long = "time", value_name = "RFC3339")]
    pub time: Option<DateTime<Utc>>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
