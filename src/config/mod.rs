// Configuration module entry point
// Loads application configuration and builds the immutable runtime state

mod state;
mod types;

use ::config::builder::{ConfigBuilder, DefaultState};
use ::config::{ConfigError, Environment, File};
use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::Config;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing file is fine: defaults plus `FIXTURE_*` environment apply
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let builder = ::config::Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("FIXTURE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        with_defaults(builder)?.build()?.try_deserialize()
    }

    /// Resolve `server.host:server.port` to a bindable address
    ///
    /// Host names are looked up; an IPv4 result is preferred when the
    /// name resolves to both families.
    pub async fn resolve_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = self.server.host.trim_start_matches('[').trim_end_matches(']');
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, self.server.port))
            .await
            .map_err(|e| format!("Invalid address '{}': {e}", self.server.host))?
            .collect();

        prefer_ipv4(&addrs)
            .ok_or_else(|| format!("Address '{}' did not resolve", self.server.host))
    }
}

/// First IPv4 address, else the first address of any family
fn prefer_ipv4(addrs: &[SocketAddr]) -> Option<SocketAddr> {
    addrs
        .iter()
        .find(|addr| addr.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("server.host", "localhost")?
        .set_default("server.port", 8000)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive", true)?
        .set_default("performance.shutdown_timeout", 10)
}

/// Built-in defaults only, without file or environment sources
#[cfg(test)]
pub fn default_config() -> Config {
    with_defaults(::config::Config::builder())
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;

    fn load_str(toml: &str) -> Config {
        let builder =
            ::config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        with_defaults(builder)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = load_str("");
        assert_eq!(cfg.server.host, "localhost");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert!(cfg.logging.access_log_file.is_none());
        assert!(cfg.performance.keep_alive);
        assert_eq!(cfg.performance.shutdown_timeout, 10);
    }

    #[test]
    fn test_file_overrides() {
        let cfg = load_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9090
            workers = 2

            [logging]
            access_log = false
            access_log_format = "json"
            "#,
        );
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.workers, Some(2));
        assert!(!cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "json");
        // Untouched sections keep defaults
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.performance.shutdown_timeout, 10);
    }

    #[test]
    fn test_invalid_port_is_error() {
        let builder = ::config::Config::builder()
            .add_source(File::from_str("[server]\nport = 70000", FileFormat::Toml));
        let result: Result<Config, _> = with_defaults(builder)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let cfg = load_str("[server]\nhost = \"127.0.0.1\"\nport = 8123");
        let addr = cfg.resolve_socket_addr().await.unwrap();
        assert_eq!(addr, "127.0.0.1:8123".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_prefer_ipv4() {
        let v6: SocketAddr = "[::1]:8000".parse().unwrap();
        let v6_other: SocketAddr = "[::2]:8000".parse().unwrap();
        let v4: SocketAddr = "127.0.0.1:8000".parse().unwrap();

        assert_eq!(prefer_ipv4(&[v6, v4]), Some(v4));
        assert_eq!(prefer_ipv4(&[v6, v6_other]), Some(v6));
        assert_eq!(prefer_ipv4(&[]), None);
    }

    #[tokio::test]
    async fn test_resolve_localhost() {
        let cfg = load_str("");
        let addr = cfg.resolve_socket_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8000);
    }
}
