//! Object-created trigger events.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Notification that a partner file landed in storage.
///
/// Only `detail.requestParameters.{bucketName,key}` is read; all other fields
/// of the notification are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub detail: EventDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub request_parameters: RequestParameters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestParameters {
    pub bucket_name: String,
    pub key: String,
}

impl TriggerEvent {
    pub fn new(bucket: &str, key: &str) -> Self {
        Self {
            detail: EventDetail {
                request_parameters: RequestParameters {
                    bucket_name: bucket.to_string(),
                    key: key.to_string(),
                },
            },
        }
    }

    /// Parse a JSON notification; missing keys are an error.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn bucket(&self) -> &str {
        &self.detail.request_parameters.bucket_name
    }

    pub fn key(&self) -> &str {
        &self.detail.request_parameters.key
    }

    /// Lower-cased `/`-separated segments of the object key.
    pub fn key_segments(&self) -> Vec<String> {
        self.key().split('/').map(str::to_lowercase).collect()
    }
}
