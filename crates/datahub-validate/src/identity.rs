//! Event filter: decides whether an object key is a partner file to validate.

use datahub_metadata::Metadata;
use datahub_model::{FileIdentity, ValidationSettings};

/// Build the identity of an incoming file, or `None` when the key is not a
/// partner file this validator is responsible for.
///
/// `segments` are the lower-cased `/`-separated parts of the object key. A
/// rejection is not a validation failure and is never reported to partners.
pub fn identify(
    segments: &[String],
    metadata: &Metadata,
    settings: &ValidationSettings,
) -> Option<FileIdentity> {
    let Some(identity) = FileIdentity::from_segments(segments) else {
        tracing::debug!(key = %segments.join("/"), "not a partner folder key");
        return None;
    };
    let folder_path = identity.folder_path();
    if !metadata.has_folder_path(&folder_path) {
        tracing::debug!(%folder_path, "folder has no schema");
        return None;
    }
    if settings.is_excluded(&identity.logical_name) {
        tracing::debug!(file = %identity.file_name, "file type is not validated");
        return None;
    }
    Some(identity)
}
