//! Time-limited private download URLs
//!
//! The deadline `e=<unix seconds>` is appended to the resource URL, the
//! whole URL is signed, and the token is appended as `&token=`. Base URLs
//! that already carry `e` or `token` query parameters are rejected.

use crate::clock::Clock;
use crate::credential::Credential;
use crate::error::{AuthError, Result};
use std::time::Duration;
use url::Url;

/// Validity window used when none is given (one hour)
pub const DEFAULT_DOWNLOAD_EXPIRY_SECS: u64 = 3600;

/// Query parameters owned by the signing scheme
const RESERVED_PARAMS: &[&str] = &["e", "token"];

/// A signed download URL and its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedDownload {
    /// Absolute Unix deadline embedded as `e=`
    pub deadline: u64,
    /// `<AccessKey>:<EncodedSign>`
    pub token: String,
    /// Fully query-augmented URL, ready to fetch
    pub url: String,
}

/// Sign `base_url` for download until `now + expires_in`.
///
/// `expires_in` defaults to [`DEFAULT_DOWNLOAD_EXPIRY_SECS`].
pub fn sign_download(
    credential: &Credential,
    clock: &dyn Clock,
    base_url: &str,
    expires_in: Option<Duration>,
) -> Result<SignedDownload> {
    validate_base_url(base_url)?;

    let expires_secs = expires_in.map_or(DEFAULT_DOWNLOAD_EXPIRY_SECS, |d| d.as_secs());
    let deadline = clock.now_unix().saturating_add(expires_secs);

    let separator = if base_url.contains('?') { '&' } else { '?' };
    let message = format!("{base_url}{separator}e={deadline}");
    let token = credential.sign(message.as_bytes());
    tracing::debug!(deadline, "signed download url: {}", message);

    let url = format!("{message}&token={token}");
    Ok(SignedDownload {
        deadline,
        token,
        url,
    })
}

/// Sign `base_url` and return only the downloadable URL.
pub fn download_url(
    credential: &Credential,
    clock: &dyn Clock,
    base_url: &str,
    expires_in: Option<Duration>,
) -> Result<String> {
    sign_download(credential, clock, base_url, expires_in).map(|signed| signed.url)
}

fn validate_base_url(base_url: &str) -> Result<()> {
    if base_url.is_empty() {
        return Err(AuthError::invalid_argument("download url must not be empty"));
    }

    let url = Url::parse(base_url).map_err(|e| {
        AuthError::invalid_argument(format!("malformed download url {base_url}: {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AuthError::invalid_argument(format!(
            "download url must be absolute http(s): {base_url}"
        )));
    }
    // the parser recovers `http:///a` as host `a`, so the authority is checked
    // on the raw string as well
    let authority_missing = base_url
        .split_once("://")
        .is_none_or(|(_, rest)| rest.is_empty() || rest.starts_with(['/', '?', '#']));
    if url.host_str().is_none_or(str::is_empty) || authority_missing {
        return Err(AuthError::invalid_argument(format!(
            "download url has no host: {base_url}"
        )));
    }
    if url.fragment().is_some() {
        return Err(AuthError::invalid_argument(format!(
            "download url must not carry a fragment: {base_url}"
        )));
    }

    for (name, _) in url.query_pairs() {
        if RESERVED_PARAMS.contains(&name.as_ref()) {
            tracing::warn!(param = %name, "download url already signed: {}", base_url);
            return Err(AuthError::invalid_argument(format!(
                "download url already carries `{name}` parameter"
            )));
        }
    }

    Ok(())
}
