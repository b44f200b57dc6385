//! HTTP response building module
//!
//! Builders for every response the server sends. None of them panic: if the
//! builder rejects a header, the error is logged and a bare response returned.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

const NOT_FOUND_HTML: &str = "<h1>Page not found</h1>";
const INTERNAL_ERROR_HTML: &str = "<h1>Internal server error</h1>";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the 404 fragment returned for unknown routes
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_html_response(NOT_FOUND_HTML.to_string(), StatusCode::NOT_FOUND, false)
}

/// Build the 500 fragment returned when a handler fails
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_html_response(
        INTERNAL_ERROR_HTML.to_string(),
        StatusCode::INTERNAL_SERVER_ERROR,
        false,
    )
}

/// Methods accepted on most routes
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 405 Method Not Allowed response listing the accepted methods
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::PAYLOAD_TOO_LARGE)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build HTML response with the given status
pub fn build_html_response(
    content: String,
    status: StatusCode,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(status)
        .header("Content-Type", HTML_CONTENT_TYPE)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a freshly generated PNG that must never be cached
pub fn build_png_response(data: Vec<u8>, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "image/png")
        .header("Content-Length", content_length)
        .header("Cache-Control", "no-store")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("PNG", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Validators attached to a served file
pub struct FileValidators<'a> {
    pub etag: &'a str,
    pub last_modified: &'a str,
}

/// Build a file download response with cache validators
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    validators: &FileValidators<'_>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", validators.etag)
        .header("Last-Modified", validators.last_modified)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a small JSON response (health probes)
pub fn build_json_response(status: StatusCode, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_404_fragment() {
        let resp = build_404_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Content-Type"], HTML_CONTENT_TYPE);
        assert_eq!(body_string(resp).await, NOT_FOUND_HTML);
    }

    #[tokio::test]
    async fn test_500_fragment() {
        let resp = build_500_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, INTERNAL_ERROR_HTML);
    }

    #[tokio::test]
    async fn test_head_keeps_content_length() {
        let resp = build_html_response("<p>hi</p>".to_string(), StatusCode::OK, true);
        assert_eq!(resp.headers()["Content-Length"], "9");
        assert!(body_string(resp).await.is_empty());
    }

    #[test]
    fn test_png_response_is_not_cacheable() {
        let resp = build_png_response(vec![1, 2, 3], false);
        assert_eq!(resp.headers()["Content-Type"], "image/png");
        assert_eq!(resp.headers()["Cache-Control"], "no-store");
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response(ALLOWED_METHODS);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");

        let resp = build_405_response("GET, OPTIONS");
        assert_eq!(resp.headers()["Allow"], "GET, OPTIONS");
    }
}
