//! `Qiniu` request tokens
//!
//! Canonical message:
//!
//! ```text
//! <METHOD> <path>[?<query>]
//! Host: <host>
//! [Content-Type: <content type>]
//!
//! [<body>]
//! ```
//!
//! The body is only signed when a content type is set and the body is
//! non-empty.

use crate::credential::Credential;
use crate::error::{AuthError, Result};
use http::{Method, Request, header};

/// Authorization scheme for signed API requests
pub const QINIU_SCHEME: &str = "Qiniu";

/// Fields of a request covered by a `Qiniu` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QiniuRequest {
    method: Method,
    host: String,
    path: String,
    content_type: Option<String>,
    body: Option<Vec<u8>>,
}

impl QiniuRequest {
    /// Describe a request by method, host and path (query included)
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            host: host.into(),
            path: path.into(),
            content_type: None,
            body: None,
        }
    }

    /// Set the content type
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Set the request body
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Collect the signed fields from an `http::Request`.
    ///
    /// The host comes from the `Host` header, falling back to the URI
    /// authority.
    pub fn from_http<B: AsRef<[u8]>>(request: &Request<B>) -> Result<Self> {
        let host = match request.headers().get(header::HOST) {
            Some(value) => value
                .to_str()
                .map_err(|_| AuthError::invalid_argument("host header is not valid ASCII"))?
                .to_string(),
            None => request
                .uri()
                .authority()
                .map(|authority| authority.as_str().to_string())
                .ok_or_else(|| AuthError::invalid_argument("request has no host"))?,
        };

        let path = request
            .uri()
            .path_and_query()
            .map_or_else(|| "/".to_string(), |pq| pq.as_str().to_string());

        let mut signed = Self::new(request.method().clone(), host, path);
        if let Some(content_type) = request.headers().get(header::CONTENT_TYPE) {
            let content_type = content_type
                .to_str()
                .map_err(|_| AuthError::invalid_argument("content-type is not valid ASCII"))?;
            signed = signed.content_type(content_type);
        }
        let body = request.body().as_ref();
        if !body.is_empty() {
            signed = signed.body(body);
        }
        Ok(signed)
    }

    fn signing_message(&self) -> Vec<u8> {
        let mut message = format!(
            "{} {}\nHost: {}",
            self.method.as_str().to_ascii_uppercase(),
            self.path,
            self.host
        );
        if let Some(content_type) = &self.content_type {
            message.push_str("\nContent-Type: ");
            message.push_str(content_type);
        }
        message.push_str("\n\n");

        let mut message = message.into_bytes();
        if self.content_type.is_some()
            && let Some(body) = self.body.as_deref().filter(|body| !body.is_empty())
        {
            message.extend_from_slice(body);
        }
        message
    }
}

/// Build the full `Qiniu <AccessKey>:<EncodedSign>` Authorization header value.
#[must_use]
pub fn qiniu_authorization(credential: &Credential, request: &QiniuRequest) -> String {
    let message = request.signing_message();
    tracing::debug!(
        access_key = credential.access_key(),
        "Qiniu string to sign:\n{}",
        String::from_utf8_lossy(&message)
    );
    format!("{QINIU_SCHEME} {}", credential.sign(&message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential::new("ak", "s").unwrap()
    }

    fn fetch_request() -> QiniuRequest {
        QiniuRequest::new(Method::POST, "api-z0.qiniu.com", "/sisyphus/fetch")
            .content_type("application/json")
            .body(r#"{"url":"http://a"}"#)
    }

    #[test]
    fn test_signing_message_with_body() {
        assert_eq!(
            String::from_utf8(fetch_request().signing_message()).unwrap(),
            "POST /sisyphus/fetch\nHost: api-z0.qiniu.com\nContent-Type: application/json\n\n{\"url\":\"http://a\"}"
        );
    }

    #[test]
    fn test_signing_message_without_content_type() {
        let request = QiniuRequest::new(Method::GET, "api.qiniu.com", "/v6/domain/list?tbl=b")
            .body("ignored");
        assert_eq!(
            String::from_utf8(request.signing_message()).unwrap(),
            "GET /v6/domain/list?tbl=b\nHost: api.qiniu.com\n\n"
        );
    }

    #[test]
    fn test_signing_message_with_content_type_and_empty_body() {
        let request = QiniuRequest::new(Method::POST, "h", "/p")
            .content_type("application/json")
            .body("");
        assert_eq!(
            String::from_utf8(request.signing_message()).unwrap(),
            "POST /p\nHost: h\nContent-Type: application/json\n\n"
        );
    }

    #[test]
    fn test_lowercase_extension_method_uppercased() {
        let method = Method::from_bytes(b"purge").unwrap();
        let request = QiniuRequest::new(method, "h", "/p");
        assert!(request.signing_message().starts_with(b"PURGE /p\n"));
    }

    #[test]
    fn test_qiniu_authorization() {
        assert_eq!(
            qiniu_authorization(&credential(), &fetch_request()),
            "Qiniu ak:1bh0i4p_qwOn9R4ddHWCHKNPcdk="
        );

        let request = QiniuRequest::new(Method::GET, "api.qiniu.com", "/v6/domain/list?tbl=b");
        assert_eq!(
            qiniu_authorization(&credential(), &request),
            "Qiniu ak:uz7RAiWl7oysxLJM_bCJYcSOciw="
        );
    }

    #[test]
    fn test_from_http() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("http://api-z0.qiniu.com/sisyphus/fetch")
            .header(header::CONTENT_TYPE, "application/json")
            .body(r#"{"url":"http://a"}"#.to_string())
            .unwrap();
        assert_eq!(QiniuRequest::from_http(&request).unwrap(), fetch_request());
    }

    #[test]
    fn test_from_http_prefers_host_header() {
        let request = Request::builder()
            .uri("http://10.0.0.1/v6/domain/list?tbl=b")
            .header(header::HOST, "api.qiniu.com")
            .body(Vec::new())
            .unwrap();
        let signed = QiniuRequest::from_http(&request).unwrap();
        assert_eq!(
            signed,
            QiniuRequest::new(Method::GET, "api.qiniu.com", "/v6/domain/list?tbl=b")
        );
    }

    #[test]
    fn test_from_http_without_host() {
        let request = Request::builder().uri("/relative").body(Vec::new()).unwrap();
        assert!(QiniuRequest::from_http(&request).is_err());
    }
}
