//! Image route handlers
//!
//! `/qr`, `/download_image/<name>` and `/download_image_page/<name>`, plus
//! the readiness probe that reports on the image directory.

use hyper::StatusCode;
use std::sync::Arc;

use super::pages;
use super::router::RequestContext;
use super::Resp;
use crate::config::AppState;
use crate::error::Error;
use crate::http::{self, cache, mime, response::FileValidators};
use crate::{logger, qr};

const FILE_NOT_FOUND: &str = "File not found";
const NO_IMAGE_YET: &str = "No image available yet";

/// Rename the newest image and answer with a QR code for its download page
pub async fn serve_qr(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Resp {
    let store = Arc::clone(&state.images);
    let pattern = state.rename_pattern.clone();
    let qr_config = state.config.qr.clone();

    let result = tokio::task::spawn_blocking(move || {
        let filename = store.take_most_recent(&pattern)?;
        let url = qr_config.download_page_url(&filename);
        let png = qr::render_png(&url, qr_config.size)?;
        Ok::<_, Error>((filename, url, png))
    })
    .await;

    match result {
        Ok(Ok((filename, url, png))) => {
            tracing::info!(file = %filename, %url, "issued QR code");
            http::response::build_png_response(png, ctx.is_head)
        }
        Ok(Err(e)) if e.is_not_found() => {
            tracing::warn!(error = %e, "QR requested but no image is available");
            pages::error_response(NO_IMAGE_YET, StatusCode::NOT_FOUND, ctx.is_head)
        }
        Ok(Err(e)) => {
            logger::log_error(&format!("Failed to issue QR code: {e}"));
            http::build_500_response()
        }
        Err(e) => {
            logger::log_error(&format!("QR task failed: {e}"));
            http::build_500_response()
        }
    }
}

/// Stream one image from the store
pub async fn serve_image(ctx: &RequestContext<'_>, state: &AppState, filename: &str) -> Resp {
    let Ok(path) = state.images.image_path(filename) else {
        tracing::warn!(file = %filename, "rejected unsafe file name");
        return pages::error_response(FILE_NOT_FOUND, StatusCode::NOT_FOUND, ctx.is_head);
    };
    if !state.images.exists(filename) {
        return pages::error_response(FILE_NOT_FOUND, StatusCode::NOT_FOUND, ctx.is_head);
    }

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return pages::error_response(FILE_NOT_FOUND, StatusCode::NOT_FOUND, ctx.is_head);
        }
        Err(e) => {
            logger::log_error(&format!("Failed to stat '{}': {e}", path.display()));
            return http::build_500_response();
        }
    };

    let modified = metadata.modified().unwrap_or(std::time::UNIX_EPOCH);
    let etag = cache::generate_etag(metadata.len(), modified);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag)
        || (ctx.if_none_match.is_none()
            && cache::not_modified_since(ctx.if_modified_since.as_deref(), modified))
    {
        return http::build_304_response(&etag);
    }

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        // Removed between the existence check and the read
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return pages::error_response(FILE_NOT_FOUND, StatusCode::NOT_FOUND, ctx.is_head);
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read '{}': {e}", path.display()));
            return http::build_500_response();
        }
    };

    let last_modified = cache::http_date(modified);
    http::response::build_file_response(
        data,
        mime::content_type_for(&path),
        &FileValidators {
            etag: &etag,
            last_modified: &last_modified,
        },
        ctx.is_head,
    )
}

/// HTML page that shows one image with a download link
pub fn serve_download_page(ctx: &RequestContext<'_>, state: &AppState, filename: &str) -> Resp {
    if !state.images.exists(filename) {
        return pages::error_response(FILE_NOT_FOUND, StatusCode::NOT_FOUND, ctx.is_head);
    }
    tracing::info!(file = %filename, "download page opened");
    http::build_html_response(pages::download_page(filename), StatusCode::OK, ctx.is_head)
}

/// Readiness: the image directory exists and can be listed
pub async fn serve_readiness(state: &Arc<AppState>) -> Resp {
    let store = Arc::clone(&state.images);
    let extension = state.config.images.list_extension.clone();
    let listed = tokio::task::spawn_blocking(move || {
        if store.directory().is_dir() {
            store.list_images(&extension).map(|names| Some(names.len()))
        } else {
            Ok(None)
        }
    })
    .await;

    match listed {
        Ok(Ok(Some(count))) => http::response::build_json_response(
            StatusCode::OK,
            &serde_json::json!({ "status": "ok", "images": count }),
        ),
        Ok(Ok(None)) => http::response::build_json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            &serde_json::json!({ "status": "unavailable", "reason": "image directory missing" }),
        ),
        Ok(Err(e)) => http::response::build_json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            &serde_json::json!({ "status": "unavailable", "reason": e.to_string() }),
        ),
        Err(e) => {
            logger::log_error(&format!("Readiness task failed: {e}"));
            http::build_500_response()
        }
    }
}
