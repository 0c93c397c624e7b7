//! Signed request builder
//!
//! A [`Client`] owns one credential and produces ready-to-send
//! `http::Request<String>` values. It never performs I/O itself.

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::fetch::FetchRequest;
use crate::form::FormBody;
use crate::pfop::PfopRequest;
use http::{Method, Request, header};
use kodo_auth::{
    Clock, Credential, Operation, PutPolicy, QiniuRequest, SystemClock, download_url,
    encode_operation, management_authorization, qiniu_authorization, upload_token,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Builds signed requests for one access key
#[derive(Clone)]
pub struct Client {
    credential: Credential,
    config: Config,
    clock: Arc<dyn Clock>,
}

impl Client {
    /// Create a client using the system clock
    pub fn new(credential: Credential, config: Config) -> Self {
        Self {
            credential,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a client from the credentials in `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let credential = config.credential()?;
        Ok(Self::new(credential, config))
    }

    /// Replace the time source used for deadlines
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Management request signed with a `QBox` token.
    ///
    /// Without a form body the request still goes out as an empty form, but
    /// the body is left out of the signature.
    pub fn management(&self, host: &str, path: &str, form: Option<&str>) -> Result<Request<String>> {
        let authorization =
            management_authorization(&self.credential, path, form.map(str::as_bytes));
        tracing::debug!(method = "POST", host, path, "built management request");

        Ok(Request::builder()
            .method(Method::POST)
            .uri(format!("{host}{path}"))
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(form.unwrap_or_default().to_string())?)
    }

    /// List buckets
    pub fn buckets(&self) -> Result<Request<String>> {
        self.management(&self.config.hosts.buckets, "/buckets", None)
    }

    /// A single management operation, e.g. `stat` or `delete`
    pub fn operation(&self, operation: &Operation) -> Result<Request<String>> {
        let path = encode_operation(operation)?;
        self.management(&self.config.hosts.rs, &path, None)
    }

    /// Several operations in one `/batch` call
    pub fn batch(&self, operations: &[Operation]) -> Result<Request<String>> {
        if operations.is_empty() {
            return Err(ClientError::Auth(kodo_auth::AuthError::invalid_argument(
                "batch needs at least one operation",
            )));
        }

        let form = operations
            .iter()
            .try_fold(FormBody::new(), |form, operation| {
                Ok::<_, ClientError>(form.append("op", &encode_operation(operation)?))
            })?
            .finish();
        tracing::debug!(count = operations.len(), "built batch body");
        self.management(&self.config.hosts.rs, "/batch", Some(&form))
    }

    /// Trigger persistent processing of a stored object
    pub fn pfop(&self, pfop: &PfopRequest) -> Result<Request<String>> {
        let form = pfop.to_form()?;
        self.management(&self.config.hosts.api, "/pfop", Some(&form))
    }

    /// Ask the service to fetch remote URLs into a bucket in the background
    pub fn async_fetch(&self, fetch: &FetchRequest) -> Result<Request<String>> {
        fetch.validate()?;

        let zone = fetch.zone.as_deref().unwrap_or(&self.config.hosts.zone);
        let host = format!("api-{zone}.qiniu.com");
        let path = "/sisyphus/fetch";
        let body = serde_json::to_string(fetch)?;

        let signed = QiniuRequest::new(Method::POST, host.as_str(), path)
            .content_type(JSON_CONTENT_TYPE)
            .body(body.as_bytes());
        let authorization = qiniu_authorization(&self.credential, &signed);
        tracing::debug!(zone, bucket = %fetch.bucket, "built async fetch request");

        Ok(Request::builder()
            .method(Method::POST)
            .uri(format!("http://{host}{path}"))
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)?)
    }

    /// Sign an arbitrary request with a `Qiniu` token, setting its
    /// `Authorization` header
    pub fn sign_request(&self, request: &mut Request<String>) -> Result<()> {
        let signed = QiniuRequest::from_http(request)?;
        let authorization = qiniu_authorization(&self.credential, &signed);
        let value = header::HeaderValue::from_str(&authorization)
            .map_err(|e| ClientError::Http(e.into()))?;
        request.headers_mut().insert(header::AUTHORIZATION, value);
        Ok(())
    }

    /// Private download URL valid for `expires_in`, or the configured
    /// default window
    pub fn download_url(&self, base_url: &str, expires_in: Option<Duration>) -> Result<String> {
        let expires_in =
            expires_in.unwrap_or(Duration::from_secs(self.config.download.expires_secs));
        Ok(download_url(
            &self.credential,
            self.clock.as_ref(),
            base_url,
            Some(expires_in),
        )?)
    }

    /// Upload token for `policy`
    pub fn upload_token(&self, policy: &PutPolicy) -> Result<String> {
        Ok(upload_token(&self.credential, policy)?)
    }

    /// Time source used for deadlines
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("credential", &self.credential)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
