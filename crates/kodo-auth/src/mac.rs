//! HMAC-SHA1 message authentication

use crate::codec;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Length of an HMAC-SHA1 digest in bytes
pub const DIGEST_LEN: usize = 20;

/// Compute the HMAC-SHA1 of `message` keyed by `secret`.
pub fn sign(secret: &[u8], message: &[u8]) -> [u8; DIGEST_LEN] {
    let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(message);

    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    digest
}

/// Compute the HMAC-SHA1 of `message` and encode it as padded URL-safe base64.
pub fn sign_encoded(secret: &[u8], message: &[u8]) -> String {
    codec::encode_padded(sign(secret, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_length() {
        assert_eq!(sign(b"s", b"").len(), DIGEST_LEN);
        assert_eq!(sign(b"", b"/buckets").len(), DIGEST_LEN);
    }

    #[test]
    fn test_known_answer() {
        assert_eq!(sign_encoded(b"s", b"/buckets"), "F8uO05YJcKQjmO7TkSQejw6wk0o=");
    }

    #[test]
    fn test_rfc2202_vector() {
        // RFC 2202 test case 2
        let digest = sign(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            digest,
            [
                0xef, 0xfc, 0xdf, 0x6a, 0xe5, 0xeb, 0x2f, 0xa2, 0xd2, 0x74, 0x16, 0xd5, 0xf1,
                0x84, 0xdf, 0x9c, 0x25, 0x9a, 0x7c, 0x79
            ]
        );
    }
}
