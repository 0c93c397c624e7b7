//! Upload tokens
//!
//! `<AccessKey>:<EncodedSign>:<EncodedPutPolicy>`, where the signature is
//! taken over the encoded policy rather than the raw JSON.

use crate::credential::Credential;
use crate::error::Result;
use crate::policy::PutPolicy;

/// Sign `policy` into an upload token.
pub fn upload_token(credential: &Credential, policy: &PutPolicy) -> Result<String> {
    let json = policy.to_json()?;
    tracing::debug!(
        access_key = credential.access_key(),
        scope = %policy.scope,
        deadline = policy.deadline,
        "signing upload policy"
    );
    Ok(credential.sign_with_data(json.as_bytes()))
}
