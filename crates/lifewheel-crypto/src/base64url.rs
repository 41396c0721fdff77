use base64ct::{Base64UrlUnpadded, Encoding};

use crate::error::CryptoError;

/// Encode for links and save files: URL-safe alphabet, no padding.
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Inverse of [`base64url_encode`]. Trailing `=` is tolerated.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, CryptoError> {
    Base64UrlUnpadded::decode_vec(s.trim_end_matches('='))
        .map_err(|e| CryptoError::InvalidBase64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_safe_output() {
        // 0xfb 0xff 0xfe maps to `+//+` in the standard alphabet.
        assert_eq!(base64url_encode(&[0xfb, 0xff, 0xfe]), "-__-");
        assert_eq!(base64url_encode(b"ab"), "YWI");
        assert_eq!(base64url_encode(b""), "");
    }

    #[test]
    fn decodes_with_or_without_padding() {
        assert_eq!(base64url_decode("YWI").unwrap(), b"ab");
        assert_eq!(base64url_decode("YWI=").unwrap(), b"ab");
        assert!(base64url_decode("").unwrap().is_empty());
    }

    #[test]
    fn binary_survives() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert_eq!(base64url_decode(&base64url_encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn rejects_foreign_characters() {
        for input in ["+/+/", "ab cd", "YW*"] {
            assert!(
                matches!(base64url_decode(input), Err(CryptoError::InvalidBase64(_))),
                "{input:?}"
            );
        }
    }
}
