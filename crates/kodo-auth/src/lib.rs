//! Kodo request signing and canonical encoding
//!
//! This crate provides:
//! - URL-safe base64 codec and encoded entry identifiers
//! - HMAC-SHA1 signing bound to an access/secret key pair
//! - Management (`QBox`) and request (`Qiniu`) authorization tokens
//! - Time-limited download URLs and upload-policy tokens
//! - The batch / pfop operation path encoder
//!
//! Every function here is pure apart from the injected [`Clock`], so a single
//! [`Credential`] can be shared freely across threads.
//!
//! # Example
//!
//! ```rust,ignore
//! use kodo_auth::{Credential, Operation, encode_operation, management_authorization};
//!
//! let credential = Credential::new("access-key", "secret-key")?;
//! let path = encode_operation(&Operation::stat("photos", "cat.jpg"))?;
//! let header = management_authorization(&credential, &path, None);
//! // POST http://rs.qiniu.com{path} with `Authorization: {header}`
//! ```

pub mod clock;
pub mod codec;
pub mod credential;
pub mod entry;
pub mod error;
pub mod mac;
pub mod operation;
pub mod policy;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use credential::Credential;
pub use entry::encode_entry;
pub use error::{AuthError, Result};
pub use operation::{
    ChangeMeta, MetaEntry, Operation, OperationSpec, StorageType, encode_operation,
    encode_operations,
};
pub use policy::{PutPolicy, PutPolicyBuilder};
pub use token::download::{DEFAULT_DOWNLOAD_EXPIRY_SECS, SignedDownload, download_url, sign_download};
pub use token::management::{management_authorization, management_token};
pub use token::qiniu::{QiniuRequest, qiniu_authorization};
pub use token::upload::upload_token;
