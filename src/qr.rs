//! QR code rendering for verification payloads.
//!
//! Renders a payload string into a PNG and returns it as a base64 data URL,
//! suitable for direct embedding in an `<img>` tag or an HTML email.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{ExtendedColorType, ImageEncoder, Luma, codecs::png::PngEncoder};
use qrcode::QrCode;

/// Default rendered width/height in pixels for the ticket QR endpoint.
pub const DEFAULT_QR_SIZE: u32 = 256;

/// Error raised while rendering a QR code.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    /// The payload could not be encoded as a QR matrix.
    #[error("failed to encode QR data: {0}")]
    Encode(String),
    /// The rendered matrix could not be written as PNG.
    #[error("failed to write QR image: {0}")]
    Image(String),
}

/// Renders `data` as a QR code PNG and returns a `data:image/png;base64,`
/// URL.
///
/// # Errors
///
/// Returns a [`QrError`] when the payload cannot be encoded or the PNG
/// cannot be written.
pub fn render_data_url(data: &str, size: u32) -> Result<String, QrError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;

    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(size, size)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::L8)
        .map_err(|e| QrError::Image(e.to_string()))?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_png_data_url() {
        let url = render_data_url("TICKET:TKT-1722470400000-AB12C:EVENT:e:USER:u", 256);
        let Ok(url) = url else {
            panic!("rendering failed");
        };
        assert!(url.starts_with("data:image/png;base64,"));
        assert!(url.len() > "data:image/png;base64,".len());
    }

    #[test]
    fn payload_is_decodable_base64() {
        let Ok(url) = render_data_url("TICKET:x:EVENT:y:USER:z", 64) else {
            panic!("rendering failed");
        };
        let Some(b64) = url.strip_prefix("data:image/png;base64,") else {
            panic!("missing data URL prefix");
        };
        let bytes = STANDARD.decode(b64);
        let Ok(bytes) = bytes else {
            panic!("base64 decode failed");
        };
        // PNG magic header.
        assert_eq!(bytes.first(), Some(&0x89));
        assert_eq!(bytes.get(1..4), Some(&b"PNG"[..]));
    }
}
