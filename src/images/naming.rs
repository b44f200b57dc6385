//! File naming rules for the image store
//!
//! Covers the randomized rename pattern and the allow-list applied to every
//! client-supplied file name before it touches the filesystem.

use crate::error::{Error, Result};
use rand::Rng;
use std::ops::RangeInclusive;

/// Placeholder substituted with the random suffix
pub const RANDOM_PLACEHOLDER: &str = "{random}";

/// Range the random suffix is drawn from (five digits)
pub const RANDOM_RANGE: RangeInclusive<u32> = 10_000..=99_999;

/// Template used to rename the most recent image
///
/// Every `{random}` occurrence is replaced by a number from [`RANDOM_RANGE`];
/// the original extension is appended afterwards. A template without the
/// placeholder is used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePattern {
    template: String,
}

impl RenamePattern {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Draw a random suffix and build the new file name
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, extension: Option<&str>) -> String {
        self.render(rng.gen_range(RANDOM_RANGE), extension)
    }

    /// Build the file name for a given suffix
    ///
    /// # Examples
    /// ```ignore
    /// let pattern = RenamePattern::new("desenho_{random}");
    /// assert_eq!(pattern.render(12345, Some("png")), "desenho_12345.png");
    /// ```
    pub fn render(&self, random: u32, extension: Option<&str>) -> String {
        let stem = self.template.replace(RANDOM_PLACEHOLDER, &random.to_string());
        match extension {
            Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
            _ => stem,
        }
    }
}

impl Default for RenamePattern {
    fn default() -> Self {
        Self::new("desenho_{random}")
    }
}

/// Reject names that could resolve outside the managed directory
///
/// A valid name is a single, non-empty path component: no separators, no
/// NUL byte, and not `.` or `..`.
pub fn validate_filename(name: &str) -> Result<&str> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if unsafe_name {
        return Err(Error::InvalidFilename(name.to_string()));
    }
    Ok(name)
}
