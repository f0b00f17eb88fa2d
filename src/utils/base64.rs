use thiserror::Error;

use base64::{
    alphabet,
    engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

const LENIENT_CONFIG: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet, padding optional on decode.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT_CONFIG);

/// URL-safe alphabet, padding optional on decode.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT_CONFIG);

/// Encodes a string to padded standard Base64.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes Base64 text to raw bytes.
///
/// Accepts both the standard and the URL-safe alphabet, with or without
/// trailing `=` padding. Surrounding whitespace is ignored.
pub fn base64_decode_bytes(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let trimmed = input.trim();
    if trimmed.contains('-') || trimmed.contains('_') {
        URL_SAFE_LENIENT.decode(trimmed)
    } else {
        STANDARD_LENIENT.decode(trimmed)
    }
}

/// Error returned by [`base64_decode`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base64TextError {
    #[error("{0}")]
    Base64(String),
    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(String),
}

/// Decodes Base64 text into a UTF-8 string.
pub fn base64_decode(input: &str) -> Result<String, Base64TextError> {
    let bytes = base64_decode_bytes(input).map_err(|e| Base64TextError::Base64(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Base64TextError::Utf8(e.to_string()))
}

/// Encodes a string to URL-safe Base64 without padding.
pub fn url_safe_base64_encode(input: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_without_padding() {
        // "chacha20-ietf-poly1305:12345678" with the padding stripped
        let decoded = base64_decode("Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNToxMjM0NTY3OA").unwrap();
        assert_eq!(decoded, "chacha20-ietf-poly1305:12345678");
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        let encoded = url_safe_base64_encode("a?b>c~");
        assert_eq!(base64_decode(&encoded).unwrap(), "a?b>c~");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            base64_decode("!!not base64!!"),
            Err(Base64TextError::Base64(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_utf8() {
        // 0xff 0xfe is not valid UTF-8
        assert!(matches!(base64_decode("//4="), Err(Base64TextError::Utf8(_))));
    }
}
