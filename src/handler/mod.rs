//! Request handler module
//!
//! Routes requests to the landing page, the QR code endpoint and the image
//! download endpoints.

pub mod images;
pub mod pages;
pub mod router;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Response type produced by every handler
pub type Resp = Response<Full<Bytes>>;

// Re-export main entry point
pub use router::handle_request;
