//! Async fetch (`sisyphus`) requests
//!
//! The service downloads one of `url` into `bucket` in the background.

use kodo_auth::AuthError;
use serde::{Serialize, Serializer};

/// Async fetch job description, serialized as the JSON request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    /// Source URLs, tried in order; sent joined with `;`
    #[serde(serialize_with = "join_urls")]
    pub url: Vec<String>,
    pub bucket: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbackurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbackbody: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbackbodytype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbackhost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<u8>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ignore_same_key: bool,
    /// Region of the fetch endpoint; the configured zone when unset
    #[serde(skip)]
    pub zone: Option<String>,
}

fn join_urls<S: Serializer>(urls: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&urls.join(";"))
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            url: vec![url.into()],
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Add a fallback source URL
    #[must_use]
    pub fn mirror(mut self, url: impl Into<String>) -> Self {
        self.url.push(url.into());
        self
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), AuthError> {
        if self.bucket.is_empty() {
            return Err(AuthError::invalid_argument("fetch needs a bucket"));
        }
        if self.url.is_empty() || self.url.iter().any(String::is_empty) {
            return Err(AuthError::invalid_argument("fetch needs non-empty source urls"));
        }
        Ok(())
    }
}
