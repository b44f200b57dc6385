//! Error types for qrdrop.
//!
//! Every fallible image-store and QR operation returns [`Error`]. The HTTP
//! layer decides the status code from the variant.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for image store and QR operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The managed directory is missing or holds no files.
    #[error("no image found in {path}: {reason}")]
    NotFound {
        /// Directory that was scanned.
        path: PathBuf,
        /// Why nothing could be returned.
        reason: &'static str,
    },

    /// A client-supplied file name failed validation.
    #[error("invalid file name: {0:?}")]
    InvalidFilename(String),

    /// Every randomized rename target was already taken.
    #[error("could not find a free file name after {attempts} attempts")]
    NameCollision {
        /// Number of names tried.
        attempts: usize,
    },

    /// Failed to create the managed directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The URL could not be encoded as a QR code.
    #[error("QR encode error: {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    /// The rendered QR code could not be written as PNG.
    #[error("image encode error: {0}")]
    ImageEncode(#[from] image::ImageError),
}

/// A specialized Result type for qrdrop operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error means there was no image to hand out.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
