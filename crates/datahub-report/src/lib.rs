//! Error log composition, the deduplicating log store, and alert emails.

pub mod compose;
pub mod description;
pub mod error;
pub mod log_store;
pub mod notify;

pub use compose::{LogComposer, clean_emails};
pub use description::describe;
pub use error::{ReportError, Result};
pub use log_store::LogStore;
pub use notify::{EmailMessage, Notifier, OutboxNotifier, TracingNotifier, split_recipients};
