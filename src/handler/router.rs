//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::{AppState, HealthConfig};
use crate::handler::{images, pages, Resp};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body;
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, StatusCode};
use std::borrow::Cow;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const DOWNLOAD_IMAGE_PREFIX: &str = "/download_image/";
const DOWNLOAD_PAGE_PREFIX: &str = "/download_image_page/";

/// `/qr` renames an image, so it is not offered for HEAD
const QR_ALLOWED_METHODS: &str = "GET, OPTIONS";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

/// Resolved route for a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route<'a> {
    Landing,
    Qr,
    DownloadImage(Cow<'a, str>),
    DownloadPage(Cow<'a, str>),
    Liveness,
    Readiness,
    NotFound,
}

impl<'a> Route<'a> {
    /// Match a request path; `<filename>` must be exactly one path segment
    ///
    /// The segment is percent-decoded; malformed escapes do not match.
    pub fn resolve(path: &'a str, health: &HealthConfig) -> Self {
        if health.enabled {
            if path == health.liveness_path {
                return Self::Liveness;
            }
            if path == health.readiness_path {
                return Self::Readiness;
            }
        }

        match path {
            "/" => Self::Landing,
            "/qr" => Self::Qr,
            _ => {
                if let Some(name) = path.strip_prefix(DOWNLOAD_PAGE_PREFIX) {
                    single_segment(name).map_or(Self::NotFound, Self::DownloadPage)
                } else if let Some(name) = path.strip_prefix(DOWNLOAD_IMAGE_PREFIX) {
                    single_segment(name).map_or(Self::NotFound, Self::DownloadImage)
                } else {
                    Self::NotFound
                }
            }
        }
    }
}

fn single_segment(name: &str) -> Option<Cow<'_, str>> {
    if name.is_empty() || name.contains('/') {
        return None;
    }
    http::uri::decode_segment(name)
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Resp, Infallible> {
    let started = Instant::now();
    let access_log = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, peer_addr));

    let mut response = respond(&req, &state).await;

    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(mut entry) = access_log {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or_default();
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn respond<B>(req: &Request<B>, state: &Arc<AppState>) -> Resp {
    let method = req.method();

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(req, state.config.http.max_body_size) {
        return resp;
    }

    // 3. Extract conditional request headers
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    let ctx = RequestContext {
        path: req.uri().path(),
        is_head: *method == Method::HEAD,
        if_none_match: header("if-none-match"),
        if_modified_since: header("if-modified-since"),
    };

    // 4. Dispatch
    route_request(&ctx, state).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Resp> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(http::response::ALLOWED_METHODS))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Resp> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Route request based on path
async fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Resp {
    match Route::resolve(ctx.path, &state.config.health) {
        Route::Liveness => http::response::build_json_response(
            StatusCode::OK,
            &serde_json::json!({ "status": "ok" }),
        ),
        Route::Readiness => images::serve_readiness(state).await,
        Route::Landing => {
            tracing::debug!("landing page requested");
            http::build_html_response(pages::landing_page(), StatusCode::OK, ctx.is_head)
        }
        Route::Qr if ctx.is_head => {
            logger::log_warning("HEAD /qr refused, it would consume an image");
            http::build_405_response(QR_ALLOWED_METHODS)
        }
        Route::Qr => images::serve_qr(ctx, state).await,
        Route::DownloadImage(name) => images::serve_image(ctx, state, &name).await,
        Route::DownloadPage(name) => images::serve_download_page(ctx, state, &name),
        Route::NotFound => {
            logger::log_warning(&format!("Page not found: {}", ctx.path));
            http::build_404_response()
        }
    }
}
