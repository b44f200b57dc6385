//! QR code rendering
//!
//! Encodes a URL as a QR code and returns it as PNG bytes.

use crate::error::Result;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

/// Render `data` as a PNG QR code at least `min_size` pixels wide
pub fn render_png(data: &str, min_size: u32) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(min_size, min_size)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn test_render_png_signature() {
        let png = render_png("http://localhost:5000/download_image_page/desenho_12345.png", 256)
            .unwrap();
        assert!(png.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_render_png_respects_min_size() {
        let png = render_png("https://example.com", 300).unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert!(decoded.width() >= 300);
        assert_eq!(decoded.width(), decoded.height());
    }

    #[test]
    fn test_render_png_rejects_oversized_payload() {
        let huge = "x".repeat(8000);
        assert!(render_png(&huge, 64).is_err());
    }
}
