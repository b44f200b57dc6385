//! HTTP cache validator module
//!
//! `ETag` and `Last-Modified` values derived from file metadata, plus the
//! matching conditional-request checks.

use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Generate an `ETag` from file size and modification time
///
/// Returns a quoted value such as `"1f4-17b2c3d4e5f"`.
pub fn generate_etag(len: u64, modified: SystemTime) -> String {
    let nanos = modified
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("\"{len:x}-{nanos:x}\"")
}

/// Format a timestamp for the `Last-Modified` header
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Check if the client's `If-None-Match` header matches the server's `ETag`
///
/// Handles lists (`"a", "b"`), the `*` wildcard and weak validators (`W/"a"`).
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|header| {
        header.split(',').map(str::trim).any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
    })
}

/// Check `If-Modified-Since` against the file's modification time
///
/// Resolution is one second, as in the header format. Unparseable dates
/// never match.
pub fn not_modified_since(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(since) = if_modified_since
        .and_then(|value| DateTime::parse_from_rfc2822(value.trim()).ok())
    else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_generate_etag() {
        let etag = generate_etag(500, at(1));
        assert_eq!(etag, "\"1f4-3b9aca00\"");
        assert_ne!(etag, generate_etag(500, at(2)));
        assert_ne!(etag, generate_etag(501, at(1)));
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "\"abc123\"";
        assert!(check_etag_match(Some("\"abc123\""), etag));
        assert!(check_etag_match(Some("\"xyz\", \"abc123\""), etag));
        assert!(check_etag_match(Some("W/\"abc123\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"different\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_http_date() {
        assert_eq!(http_date(at(784_111_777)), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_not_modified_since() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(not_modified_since(Some(header), at(784_111_777)));
        assert!(not_modified_since(Some(header), at(784_111_700)));
        assert!(!not_modified_since(Some(header), at(784_111_778)));
        assert!(!not_modified_since(Some("yesterday"), at(0)));
        assert!(!not_modified_since(None, at(0)));
    }
}
