//! Upload policies
//!
//! A put policy is the JSON document an upload token carries. Its `scope`
//! addresses a bucket (`bucket`), a single object (`bucket:key`) or every
//! object under a prefix (`bucket:prefix` with `isPrefixalScope=1`).

use crate::clock::Clock;
use crate::error::{AuthError, Result};
use crate::operation::StorageType;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upload policy document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutPolicy {
    pub scope: String,
    pub deadline: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prefixal_scope: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_only: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_ops: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistent_pipeline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fsize_min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fsize_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_mime: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_after_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<u8>,
}

impl PutPolicy {
    /// Bucket named by the scope
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.scope
            .split_once(':')
            .map_or(self.scope.as_str(), |(bucket, _)| bucket)
    }

    /// Key (or key prefix) named by the scope, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.scope.split_once(':').map(|(_, key)| key)
    }

    /// Serialize to the JSON document that gets signed
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Builder for [`PutPolicy`]
#[derive(Debug, Clone)]
pub struct PutPolicyBuilder {
    policy: PutPolicy,
}

impl PutPolicyBuilder {
    /// Policy allowing uploads of any key into `bucket`
    pub fn new_for_bucket(bucket: &str, clock: &dyn Clock, expires_in: Duration) -> Result<Self> {
        Self::with_scope(bucket, bucket.to_string(), clock, expires_in)
    }

    /// Policy allowing uploads of exactly `bucket:key`
    pub fn new_for_object(
        bucket: &str,
        key: &str,
        clock: &dyn Clock,
        expires_in: Duration,
    ) -> Result<Self> {
        Self::with_scope(bucket, format!("{bucket}:{key}"), clock, expires_in)
    }

    /// Policy allowing uploads of any key starting with `prefix`
    pub fn new_for_objects_with_prefix(
        bucket: &str,
        prefix: &str,
        clock: &dyn Clock,
        expires_in: Duration,
    ) -> Result<Self> {
        let mut builder = Self::with_scope(bucket, format!("{bucket}:{prefix}"), clock, expires_in)?;
        builder.policy.is_prefixal_scope = Some(1);
        Ok(builder)
    }

    fn with_scope(
        bucket: &str,
        scope: String,
        clock: &dyn Clock,
        expires_in: Duration,
    ) -> Result<Self> {
        if bucket.is_empty() {
            return Err(AuthError::invalid_argument("bucket name must not be empty"));
        }
        Ok(Self {
            policy: PutPolicy {
                scope,
                deadline: clock.now_unix().saturating_add(expires_in.as_secs()),
                ..PutPolicy::default()
            },
        })
    }

    /// Only allow creating new objects, never overwriting
    #[must_use]
    pub fn insert_only(mut self) -> Self {
        self.policy.insert_only = Some(1);
        self
    }

    #[must_use]
    pub fn end_user(mut self, end_user: impl Into<String>) -> Self {
        self.policy.end_user = Some(end_user.into());
        self
    }

    /// 303 redirect target for browser form uploads
    #[must_use]
    pub fn return_url(mut self, url: impl Into<String>) -> Self {
        self.policy.return_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn return_body(mut self, body: impl Into<String>) -> Self {
        self.policy.return_body = Some(body.into());
        self
    }

    /// Callback after upload; multiple URLs are tried in order
    #[must_use]
    pub fn callback<S: AsRef<str>>(
        mut self,
        urls: &[S],
        host: Option<&str>,
        body: impl Into<String>,
        body_type: Option<&str>,
    ) -> Self {
        let urls: Vec<&str> = urls.iter().map(AsRef::as_ref).collect();
        self.policy.callback_url = Some(urls.join(";"));
        self.policy.callback_host = host.map(ToString::to_string);
        self.policy.callback_body = Some(body.into());
        self.policy.callback_body_type = body_type.map(ToString::to_string);
        self
    }

    /// Persistent processing commands run after upload, joined by `;`
    #[must_use]
    pub fn persistent_ops<S: AsRef<str>>(
        mut self,
        ops: &[S],
        notify_url: Option<&str>,
        pipeline: Option<&str>,
    ) -> Self {
        let ops: Vec<&str> = ops.iter().map(AsRef::as_ref).collect();
        self.policy.persistent_ops = Some(ops.join(";"));
        self.policy.persistent_notify_url = notify_url.map(ToString::to_string);
        self.policy.persistent_pipeline = pipeline.map(ToString::to_string);
        self
    }

    #[must_use]
    pub fn save_key(mut self, save_key: impl Into<String>) -> Self {
        self.policy.save_key = Some(save_key.into());
        self
    }

    /// Accepted upload size range in bytes
    #[must_use]
    pub fn file_size(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.policy.fsize_min = min;
        self.policy.fsize_limit = max;
        self
    }

    /// Accepted MIME types, e.g. `image/*;!image/gif`
    #[must_use]
    pub fn mime_limit(mut self, mime_limit: impl Into<String>) -> Self {
        self.policy.mime_limit = Some(mime_limit.into());
        self
    }

    #[must_use]
    pub fn detect_mime(mut self) -> Self {
        self.policy.detect_mime = Some(1);
        self
    }

    #[must_use]
    pub fn delete_after_days(mut self, days: u32) -> Self {
        self.policy.delete_after_days = Some(days);
        self
    }

    #[must_use]
    pub fn file_type(mut self, storage_type: StorageType) -> Self {
        self.policy.file_type = Some(storage_type as u8);
        self
    }

    #[must_use]
    pub fn build(self) -> PutPolicy {
        self.policy
    }
}
