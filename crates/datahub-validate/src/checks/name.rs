//! File name check (error code 1).

use datahub_metadata::ScopedMetadata;
use datahub_model::{FileIdentity, ValidationFailure, ValidationSettings};

use super::CheckResult;

const EXTENSION: &str = "csv";
const STAMP_LEN: usize = 8;

fn is_date_stamp(stamp: &str) -> bool {
    stamp.len() == STAMP_LEN && stamp.bytes().all(|byte| byte.is_ascii_digit())
}

/// Check that the file is named `<logical>_<yyyymmdd>.csv` with a known
/// logical name and a schema to validate against.
pub fn check(
    identity: &FileIdentity,
    scoped: &ScopedMetadata<'_>,
    settings: &ValidationSettings,
) -> CheckResult {
    let parts: Vec<&str> = identity.date_segment.split('.').collect();
    let well_formed = matches!(
        parts.as_slice(),
        [stamp, extension] if *extension == EXTENSION && is_date_stamp(stamp)
    );
    let known_name = settings.is_recognized(&identity.logical_name) || scoped.has_schema();

    if well_formed && known_name && scoped.has_schema() {
        return Ok(());
    }
    tracing::info!(
        file = %identity.file_name,
        well_formed,
        known_name,
        has_schema = scoped.has_schema(),
        "file name rejected"
    );
    Err(ValidationFailure::WrongFileName {
        path: identity.path_segments(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_stamp_is_eight_digits() {
        assert!(is_date_stamp("20200128"));
        assert!(!is_date_stamp("2020012"));
        assert!(!is_date_stamp("202001288"));
        assert!(!is_date_stamp("2020-1-28"));
    }
}
