//! VAPID key codec.
//!
//! The backend serves its VAPID public key as unpadded base64url; the
//! platform subscribe call wants the raw 65-byte uncompressed P-256
//! point. Subscription keys travel the other way: raw bytes out of the
//! platform, standard (non-URL-safe) base64 into the backend. A wrong
//! alphabet or length here breaks push delivery with no visible error,
//! so both directions are pinned by test vectors.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

/// Length in bytes of an uncompressed P-256 public key (0x04 marker plus
/// two 32-byte coordinates).
pub const VAPID_PUBLIC_KEY_LEN: usize = 65;

/// Errors from VAPID key decoding.
#[derive(Debug, thiserror::Error)]
pub enum KeyCodecError {
    /// The input is not valid base64url.
    #[error("Invalid base64url key material: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    /// The key decoded, but not to an uncompressed P-256 point.
    #[error("VAPID key has {actual} bytes, expected {expected}")]
    UnexpectedLength { expected: usize, actual: usize },
}

/// Decode a URL-safe base64 VAPID public key into its raw byte buffer.
///
/// Accepts both padded and unpadded input (servers differ on whether
/// they strip the trailing `=`). The result must be exactly
/// [`VAPID_PUBLIC_KEY_LEN`] bytes.
pub fn decode_vapid_key(key: &str) -> Result<Vec<u8>, KeyCodecError> {
    let trimmed = key.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(trimmed)?;

    if bytes.len() != VAPID_PUBLIC_KEY_LEN {
        return Err(KeyCodecError::UnexpectedLength {
            expected: VAPID_PUBLIC_KEY_LEN,
            actual: bytes.len(),
        });
    }

    Ok(bytes)
}

/// Encode raw subscription key bytes as standard (non-URL-safe, padded)
/// base64 -- the encoding the backend expects for `p256dh` and `auth`.
pub fn encode_key_buffer(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Well-known web-push demo VAPID key: 87 unpadded base64url chars
    /// decoding to a 65-byte uncompressed P-256 point.
    const KNOWN_VAPID_KEY: &str =
        "BEl62iUYgUivxIkv69yViEuiBIa-Ib9-SkvMeAtA3LFgDzkrxZJjSgSnfckjBJuBkr3qBUYIHBQFLXYp5Nksh8U";

    #[test]
    fn known_vapid_key_decodes_to_65_bytes() {
        let bytes = decode_vapid_key(KNOWN_VAPID_KEY).unwrap();

        assert_eq!(bytes.len(), VAPID_PUBLIC_KEY_LEN);
        // Uncompressed EC point marker.
        assert_eq!(bytes[0], 0x04);
        // Spot-check against a reference base64url decoder.
        assert_eq!(&bytes[..8], &[4, 73, 122, 218, 37, 24, 129, 72]);
        assert_eq!(bytes[64], 197);
    }

    #[test]
    fn padded_and_unpadded_input_decode_identically() {
        let unpadded = decode_vapid_key(KNOWN_VAPID_KEY).unwrap();
        let padded = decode_vapid_key(&format!("{KNOWN_VAPID_KEY}=")).unwrap();
        assert_eq!(unpadded, padded);
    }

    #[test]
    fn url_safe_alphabet_is_translated() {
        // '-' and '_' are only legal in the URL-safe alphabet; a standard
        // decoder would reject this input outright.
        assert!(KNOWN_VAPID_KEY.contains('-'));
        let via_codec = decode_vapid_key(KNOWN_VAPID_KEY).unwrap();
        let via_standard = STANDARD
            .decode(format!(
                "{}=",
                KNOWN_VAPID_KEY.replace('-', "+").replace('_', "/")
            ))
            .unwrap();
        assert_eq!(via_codec, via_standard);
    }

    #[test]
    fn rejects_wrong_length_keys() {
        // 32 bytes of zeroes -- a valid base64url string, wrong curve format.
        let short = URL_SAFE_NO_PAD.encode([0u8; 32]);
        assert_matches!(
            decode_vapid_key(&short),
            Err(KeyCodecError::UnexpectedLength {
                expected: 65,
                actual: 32
            })
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        assert_matches!(
            decode_vapid_key("not!valid@base64"),
            Err(KeyCodecError::InvalidBase64(_))
        );
    }

    #[test]
    fn encode_uses_standard_alphabet_with_padding() {
        // 0xFB 0xEF 0xBE encodes to all-'+' in the standard alphabet; a
        // URL-safe encoder would produce "----".
        assert_eq!(encode_key_buffer(&[0xFB, 0xEF, 0xBE]), "++++");
        assert_eq!(encode_key_buffer(&[1, 2, 3, 4, 5, 6, 7, 8]), "AQIDBAUGBwg=");
    }

    #[test]
    fn encode_round_trips_through_standard_decoder() {
        let original: Vec<u8> = (0u8..=255).collect();
        let encoded = encode_key_buffer(&original);
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, original);
    }
}
