//! HTTP protocol layer module
//!
//! Response builders, conditional-request validators, content types and
//! path-segment encoding,
//! decoupled from the image and page handlers.

pub mod cache;
pub mod mime;
pub mod response;
pub mod uri;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_500_response, build_html_response, build_options_response,
};
