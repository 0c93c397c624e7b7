//! Persistent processing (`pfop`) requests

use crate::form::FormBody;
use kodo_auth::{AuthError, encode_entry};

/// A persistent processing job on one stored object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PfopRequest {
    pub bucket: String,
    pub key: String,
    /// Processing commands, joined with `;`
    pub fops: Vec<String>,
    pub notify_url: Option<String>,
    /// Re-run even if the outputs already exist
    pub force: bool,
    pub pipeline: Option<String>,
}

impl PfopRequest {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    /// Append a processing command, e.g. `avthumb/mp4`
    #[must_use]
    pub fn fop(mut self, fop: impl Into<String>) -> Self {
        self.fops.push(fop.into());
        self
    }

    #[must_use]
    pub fn notify_url(mut self, url: impl Into<String>) -> Self {
        self.notify_url = Some(url.into());
        self
    }

    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    #[must_use]
    pub fn pipeline(mut self, pipeline: impl Into<String>) -> Self {
        self.pipeline = Some(pipeline.into());
        self
    }

    /// Form body in the order the service documents:
    /// `bucket`, `key`, `force`, `notifyURL`, `pipeline`, `fops`
    pub fn to_form(&self) -> Result<String, AuthError> {
        if self.bucket.is_empty() || self.key.is_empty() {
            return Err(AuthError::invalid_argument("pfop needs both bucket and key"));
        }
        if self.fops.is_empty() {
            return Err(AuthError::invalid_argument("pfop needs at least one fop"));
        }

        let mut form = FormBody::new()
            .append("bucket", &self.bucket)
            .append("key", &self.key);
        if self.force {
            form = form.append("force", "1");
        }
        if let Some(url) = &self.notify_url {
            form = form.append("notifyURL", url);
        }
        if let Some(pipeline) = &self.pipeline {
            form = form.append("pipeline", pipeline);
        }
        Ok(form.append("fops", &self.fops.join(";")).finish())
    }
}

/// `saveas/<EncodedEntryURI>` suffix that stores a fop result at `bucket:key`
pub fn saveas(bucket: &str, key: &str) -> Result<String, AuthError> {
    Ok(format!("saveas/{}", encode_entry(bucket, Some(key))?))
}
