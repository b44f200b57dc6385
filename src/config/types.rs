// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::http::uri::encode_segment;
use crate::images::RenamePattern;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub images: ImagesConfig,
    pub qr: QrConfig,
    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Log output encoding
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}

/// Managed image directory configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ImagesConfig {
    /// Directory the drawing process writes into
    pub directory: PathBuf,
    /// Template for renamed images, `{random}` is replaced by five digits
    pub rename_pattern: String,
    /// Extension used when listing images
    pub list_extension: String,
    /// Files created longer ago than this are pruned
    pub max_age_minutes: u64,
    /// Background pruning interval, 0 disables it
    pub prune_interval_secs: u64,
}

impl ImagesConfig {
    pub fn rename_pattern(&self) -> RenamePattern {
        RenamePattern::new(self.rename_pattern.clone())
    }

    pub const fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_minutes.saturating_mul(60))
    }

    pub const fn prune_interval(&self) -> Option<Duration> {
        if self.prune_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.prune_interval_secs))
        }
    }
}

/// QR code configuration
#[derive(Debug, Deserialize, Clone)]
pub struct QrConfig {
    /// Public URL prefix embedded in generated codes
    pub base_url: String,
    /// Minimum rendered width/height in pixels
    pub size: u32,
}

impl QrConfig {
    /// Absolute URL of the download page for `filename`
    pub fn download_page_url(&self, filename: &str) -> String {
        format!(
            "{}/download_image_page/{}",
            self.base_url.trim_end_matches('/'),
            encode_segment(filename)
        )
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}
