// Application state module
// Shared, read-only context handed to every request

use std::sync::Arc;

use super::types::Config;
use crate::error::Result;
use crate::images::{ImageStore, RenamePattern};

/// Application state
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub images: Arc<ImageStore>,
    pub rename_pattern: RenamePattern,
}

impl AppState {
    /// Build state from configuration, creating the image directory if needed
    pub fn new(config: Config) -> Result<Self> {
        let images = Arc::new(ImageStore::open(&config.images.directory)?);
        let rename_pattern = config.images.rename_pattern();

        Ok(Self {
            config,
            images,
            rename_pattern,
        })
    }
}
