//! QR token rendering.
//!
//! Turns an opaque login token into a base64 PNG data URL, the exact string
//! written to the QR output file for the web UI to display.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chatharvest_types::error::QrError;
use qrcode::QrCode;

/// Encode a raw login token as a `data:image/png;base64,...` string.
///
/// Fails when the token does not fit in a QR symbol or the PNG encoder
/// rejects the rendered image. Callers treat failure as non-fatal; a later
/// `qr` event carries a fresh token.
pub fn encode_data_url(token: &str) -> Result<String, QrError> {
    let code = QrCode::new(token.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;
    let rendered = code.render::<image::Luma<u8>>().build();

    let mut png = Vec::new();
    rendered
        .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(|e| QrError::Image(e.to_string()))?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_produces_png_data_url() {
        let data_url = encode_data_url("1@abcdef,secret,token").unwrap();
        let payload = data_url.strip_prefix("data:image/png;base64,").unwrap();

        let bytes = STANDARD.decode(payload).unwrap();
        // PNG signature
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = encode_data_url("same-token").unwrap();
        let b = encode_data_url("same-token").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_oversized_token_fails_cleanly() {
        // QR capacity tops out around 3 KB; an 8 KB token cannot be encoded.
        let oversized = "x".repeat(8192);
        let err = encode_data_url(&oversized).unwrap_err();
        assert!(matches!(err, QrError::Encode(_)));
    }
}
