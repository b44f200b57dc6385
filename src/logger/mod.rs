//! Logger module
//!
//! Installs the `tracing` subscriber and provides the logging helpers used
//! across the server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LogFormat, LoggingConfig};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Target used for access log lines, filterable with `RUST_LOG=access=off`
pub const ACCESS_TARGET: &str = "access";

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once
/// at application startup.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        listen = %format!("http://{addr}"),
        images = %config.images.directory.display(),
        base_url = %config.qr.base_url,
        workers = config.server.workers,
        "server started"
    );
    if let Some(interval) = config.images.prune_interval() {
        tracing::info!(
            every_secs = interval.as_secs(),
            max_age_minutes = config.images.max_age_minutes,
            "background pruning scheduled"
        );
    }
}

pub fn log_server_stop(addr: &SocketAddr) {
    tracing::info!(listen = %addr, "server stopped accepting connections");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!(error = ?err, "failed to serve connection");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
