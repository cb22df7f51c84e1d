//! `data:` URL handling for sources that arrive as strings.

use base64::engine::general_purpose;
use base64::Engine;

use super::DecodeError;

const BASE64_MARKER: &str = ";base64,";

/// Extract the raw bytes from a `data:image/...;base64,` URL.
///
/// Surrounding whitespace is ignored. Non-image and non-base64 data URLs are
/// rejected.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, DecodeError> {
    let normalized = url.trim();

    if !normalized.starts_with("data:image/") {
        return Err(DecodeError::InvalidDataUrl(
            "expected a data:image/ prefix".to_string(),
        ));
    }

    let start = normalized
        .find(BASE64_MARKER)
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing ;base64, marker".to_string()))?;
    let payload = &normalized[start + BASE64_MARKER.len()..];

    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }

    general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| DecodeError::Base64(e.to_string()))
}

/// Build a `data:` URL from a MIME type and raw bytes.
pub fn encode_data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime_type}{BASE64_MARKER}{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_data_url("data:image/png;base64,AQID").unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_trims_whitespace() {
        let bytes = decode_data_url("  data:image/jpeg;base64,AQID\n").unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_rejects_non_image() {
        let result = decode_data_url("data:text/plain;base64,AQID");
        assert!(matches!(result, Err(DecodeError::InvalidDataUrl(_))));
    }

    #[test]
    fn test_rejects_missing_marker() {
        let result = decode_data_url("data:image/png,AQID");
        assert!(matches!(result, Err(DecodeError::InvalidDataUrl(_))));
    }

    #[test]
    fn test_rejects_empty_payload() {
        assert_eq!(
            decode_data_url("data:image/png;base64,"),
            Err(DecodeError::Empty)
        );
    }

    #[test]
    fn test_rejects_bad_base64() {
        let result = decode_data_url("data:image/png;base64,!!!");
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_encode_data_url() {
        assert_eq!(
            encode_data_url("image/png", &[1, 2, 3]),
            "data:image/png;base64,AQID"
        );
    }
}
