//! Validation check modules.
//!
//! Each module performs one check of the pipeline and reports the first
//! problem it finds as a [`ValidationFailure`].

pub mod datatype;
pub mod empty;
pub mod name;
pub mod primary_key;
pub mod structure;

use datahub_model::ValidationFailure;

/// Result of a single check.
pub type CheckResult = Result<(), ValidationFailure>;
