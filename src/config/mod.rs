// Configuration module entry point
// Loads application configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, ImagesConfig, LogFormat, LoggingConfig, PerformanceConfig,
    QrConfig, ServerConfig,
};

/// Default config file (extension optional, resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Prefix for environment overrides, e.g. `QRDROP__SERVER__PORT=8080`
const ENV_PREFIX: &str = "QRDROP";

impl Config {
    /// Load configuration from the given file path plus `QRDROP__*` environment variables
    ///
    /// A missing file is not an error; every key has a default.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "qrdrop")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("images.directory", "static/images")?
            .set_default("images.rename_pattern", "desenho_{random}")?
            .set_default("images.list_extension", ".png")?
            .set_default("images.max_age_minutes", 10)?
            .set_default("images.prune_interval_secs", 0)?
            .set_default("qr.base_url", "http://localhost:5000")?
            .set_default("qr.size", 256)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

/// Default configuration rooted at `directory`, for tests
#[cfg(test)]
pub fn test_config(directory: &std::path::Path) -> Config {
    let mut cfg = Config::load_from("qrdrop-test-config-that-does-not-exist")
        .expect("defaults should deserialize");
    cfg.images.directory = directory.to_path_buf();
    cfg.logging.access_log = false;
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("qrdrop-test-config-that-does-not-exist").unwrap();
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.images.directory, std::path::PathBuf::from("static/images"));
        assert_eq!(cfg.images.rename_pattern, "desenho_{random}");
        assert_eq!(cfg.images.list_extension, ".png");
        assert_eq!(cfg.images.max_age_minutes, 10);
        assert_eq!(cfg.images.prune_interval(), None);
        assert_eq!(cfg.logging.format, LogFormat::Text);
        assert!(cfg.health.enabled);
        assert!(cfg.server.workers.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8081
workers = 2

[logging]
format = "json"

[images]
directory = "/tmp/drawings"
rename_pattern = "art_{{random}}"

[qr]
base_url = "https://draw.example.com"
"#
        )
        .unwrap();

        let cfg = Config::load_from(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.workers, Some(2));
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.images.directory, std::path::PathBuf::from("/tmp/drawings"));
        assert_eq!(cfg.images.rename_pattern, "art_{random}");
        assert_eq!(cfg.qr.base_url, "https://draw.example.com");
        // Untouched keys keep their defaults
        assert_eq!(cfg.qr.size, 256);
    }

    #[test]
    fn test_socket_addr() {
        let mut cfg = Config::load_from("qrdrop-test-config-that-does-not-exist").unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 5050;
        assert_eq!(cfg.get_socket_addr().unwrap().port(), 5050);

        cfg.server.host = "not an address".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
