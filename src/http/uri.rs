//! Percent-encoding for the path segment that carries an image name

use std::borrow::Cow;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// RFC 3986 unreserved bytes, left as-is
const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Encode a file name for use as a single URL path segment
pub fn encode_segment(segment: &str) -> Cow<'_, str> {
    if segment.bytes().all(is_unreserved) {
        return Cow::Borrowed(segment);
    }

    let mut encoded = String::with_capacity(segment.len() * 3);
    for byte in segment.bytes() {
        if is_unreserved(byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push('%');
            encoded.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            encoded.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
        }
    }
    Cow::Owned(encoded)
}

/// Decode a path segment; `None` for malformed escapes or non-UTF-8 results
pub fn decode_segment(segment: &str) -> Option<Cow<'_, str>> {
    if !segment.contains('%') {
        return Some(Cow::Borrowed(segment));
    }

    let bytes = segment.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes.get(i + 1..i + 3)?;
            if !hex.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            let hex = std::str::from_utf8(hex).ok()?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok().map(Cow::Owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_plain_name_is_borrowed() {
        assert!(matches!(
            encode_segment("desenho_12345.png"),
            Cow::Borrowed("desenho_12345.png")
        ));
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode_segment("my art #1?.png"), "my%20art%20%231%3F.png");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
        assert_eq!(encode_segment("ç.png"), "%C3%A7.png");
    }

    #[test]
    fn test_decode_reverses_encode() {
        let name = "my art #1?.png";
        assert_eq!(decode_segment(&encode_segment(name)).unwrap(), name);
        assert_eq!(decode_segment("%c3%a7.png").unwrap(), "ç.png");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(decode_segment("bad%2").is_none());
        assert!(decode_segment("bad%zz.png").is_none());
        assert!(decode_segment("bad%+1.png").is_none());
        assert!(decode_segment("%ff.png").is_none());
    }
}
