//! MIME type detection module
//!
//! Content types for the files the image store hands out.

use std::path::Path;

/// Get MIME Content-Type based on a file's extension (case-insensitive)
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        Some("html" | "htm") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_types() {
        assert_eq!(content_type_for(Path::new("desenho_12345.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a/b/photo.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("x.webp")), "image/webp");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for(Path::new("notes.xyz")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }
}
