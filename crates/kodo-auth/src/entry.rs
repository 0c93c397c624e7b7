//! Encoded entry identifiers
//!
//! An entry is a `(bucket, key)` pair. The service addresses it as the
//! unpadded URL-safe base64 of `bucket:key`, or of `bucket` alone for
//! bucket-level operations.

use crate::codec;
use crate::error::{AuthError, Result};

/// Encode a bucket and optional key into an `EncodedEntryURI`.
///
/// Fails only when `bucket` is empty. An empty key is still a key, so
/// `Some("")` encodes `bucket:`.
pub fn encode_entry(bucket: &str, key: Option<&str>) -> Result<String> {
    if bucket.is_empty() {
        return Err(AuthError::invalid_argument("bucket name must not be empty"));
    }

    Ok(match key {
        Some(key) => codec::encode(format!("{bucket}:{key}")),
        None => codec::encode(bucket),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_entry_with_key() {
        assert_eq!(encode_entry("b", Some("k1")).unwrap(), "YjprMQ");
        assert_eq!(
            encode_entry("bucket", Some("a/b+c?")).unwrap(),
            "YnVja2V0OmEvYitjPw"
        );
    }

    #[test]
    fn test_encode_entry_bucket_only() {
        assert_eq!(encode_entry("b", None).unwrap(), "Yg");
    }

    #[test]
    fn test_encoded_entry_is_path_safe() {
        let encoded = encode_entry("my-bucket", Some("dir/sub dir/file?.txt")).unwrap();
        assert!(!encoded.contains([':', '/', '+', '=', '?']));
        assert_eq!(
            codec::decode(&encoded).unwrap(),
            b"my-bucket:dir/sub dir/file?.txt"
        );
    }

    #[test]
    fn test_encode_entry_deterministic() {
        let a = encode_entry("photos", Some("2024/cat.jpg")).unwrap();
        let b = encode_entry("photos", Some("2024/cat.jpg")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_bucket_rejected() {
        let err = encode_entry("", Some("k")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidArgument(_)));
    }
}
