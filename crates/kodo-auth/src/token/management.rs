//! `QBox` management tokens
//!
//! Canonical message: the request path (with query, without host), followed
//! by `\n` and the raw body when a body is present. An absent body and an
//! empty body sign differently; callers must pick one and stick to it.

use crate::credential::Credential;

/// Authorization scheme for management requests
pub const QBOX_SCHEME: &str = "QBox";

/// Build `<AccessKey>:<EncodedSign>` for a management request.
#[must_use]
pub fn management_token(credential: &Credential, path: &str, body: Option<&[u8]>) -> String {
    let message = signing_message(path, body);
    tracing::debug!(
        access_key = credential.access_key(),
        "QBox string to sign: {}",
        String::from_utf8_lossy(&message)
    );
    credential.sign(&message)
}

/// Build the full `QBox <token>` Authorization header value.
#[must_use]
pub fn management_authorization(credential: &Credential, path: &str, body: Option<&[u8]>) -> String {
    format!("{QBOX_SCHEME} {}", management_token(credential, path, body))
}

fn signing_message(path: &str, body: Option<&[u8]>) -> Vec<u8> {
    let mut message = path.as_bytes().to_vec();
    if let Some(body) = body {
        message.push(b'\n');
        message.extend_from_slice(body);
    }
    message
}
