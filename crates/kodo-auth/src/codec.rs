//! URL-safe base64 codec
//!
//! Standard base64 with `+` replaced by `-` and `/` replaced by `_`, so the
//! output can be embedded in a URL path segment. Entry identifiers and
//! operation segments are emitted without padding; signatures and encoded
//! policies keep it, which is what the service verifies against.

use crate::error::{AuthError, Result};
use base64::{
    Engine,
    alphabet,
    engine::{
        DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig,
        general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    },
};

/// Decoder that accepts input with or without trailing `=`
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded URL-safe base64.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Encode bytes as padded URL-safe base64.
pub fn encode_padded(data: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(data)
}

/// Decode URL-safe base64, padded or not.
pub fn decode(encoded: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    URL_SAFE_LENIENT
        .decode(encoded)
        .map_err(|e| AuthError::invalid_argument(format!("malformed url-safe base64: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alphabet_substitution() {
        // 0xfb 0xff 0xfe is "+//+" in the standard alphabet
        assert_eq!(encode([0xfb, 0xff, 0xfe]), "-__-");
        assert_eq!(encode("image/png"), "aW1hZ2UvcG5n");
        assert_eq!(encode("fsize>=1"), "ZnNpemU-PTE");
    }

    #[test]
    fn test_padding() {
        assert_eq!(encode("v1"), "djE");
        assert_eq!(encode_padded("v1"), "djE=");
        assert_eq!(encode(""), "");
    }

    #[test]
    fn test_decode_accepts_both_forms() {
        assert_eq!(decode("djE").unwrap(), b"v1");
        assert_eq!(decode("djE=").unwrap(), b"v1");
        assert!(decode("not base64!").is_err());
    }

    proptest! {
        #[test]
        fn prop_round_trip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let encoded = encode(&data);
            prop_assert!(!encoded.contains(['+', '/', '=']));
            prop_assert_eq!(decode(&encoded).unwrap(), data.clone());
            prop_assert_eq!(decode(encode_padded(&data)).unwrap(), data);
        }
    }
}
