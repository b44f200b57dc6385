//! Image store module
//!
//! Everything that touches the managed image directory: newest-file lookup
//! with randomized rename, existence checks, listing and age-based pruning.

pub mod janitor;
pub mod naming;
pub mod store;

pub use naming::{validate_filename, RenamePattern};
pub use store::{ImageEntry, ImageStore, PruneReport};
