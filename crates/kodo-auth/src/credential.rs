//! Access/secret key pair

use crate::codec;
use crate::error::{AuthError, Result};
use crate::mac;
use serde::Deserialize;
use std::fmt;

/// An access key and the secret used to sign on its behalf.
///
/// Immutable once built. Rotating keys means building a new `Credential`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCredential")]
pub struct Credential {
    access_key: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct RawCredential {
    access_key: String,
    secret_key: String,
}

impl TryFrom<RawCredential> for Credential {
    type Error = AuthError;

    fn try_from(raw: RawCredential) -> Result<Self> {
        Self::new(raw.access_key, raw.secret_key)
    }
}

impl Credential {
    /// Create a credential, rejecting empty keys
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Result<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();

        if access_key.is_empty() {
            return Err(AuthError::configuration("access key is required"));
        }
        if secret_key.is_empty() {
            return Err(AuthError::configuration("secret key is required"));
        }

        Ok(Self {
            access_key,
            secret_key,
        })
    }

    /// The public access key
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Sign `data` and return `<AccessKey>:<EncodedSign>`
    #[must_use]
    pub fn sign(&self, data: &[u8]) -> String {
        let signature = mac::sign_encoded(self.secret_key.as_bytes(), data);
        format!("{}:{}", self.access_key, signature)
    }

    /// Encode `data`, sign the encoded form and return
    /// `<AccessKey>:<EncodedSign>:<EncodedData>`
    #[must_use]
    pub fn sign_with_data(&self, data: &[u8]) -> String {
        let encoded = codec::encode_padded(data);
        let signed = self.sign(encoded.as_bytes());
        format!("{signed}:{encoded}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}
