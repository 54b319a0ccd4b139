//! Metadata store: the schema table, field rules and partner schedules that
//! drive validation, with partner file swaps applied.

pub mod error;
pub mod loader;
pub mod regex;
pub mod store;
pub mod swap;

pub use error::{MetadataError, Result};
pub use loader::{field_rules, load_metadata, parse_metadata, partner_schedules, schema_rows};
pub use regex::regex_for;
pub use store::{Metadata, ScopedMetadata};
pub use swap::{apply_rule_swaps, apply_schema_swaps, parse_ignore_spec, parse_swap_spec};
