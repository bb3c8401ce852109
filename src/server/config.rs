//! Server configuration
//!
//! Values are layered: built-in defaults, then an optional `ftserver.toml`
//! in the working directory, then `FTSERVER_*` environment variables, and
//! finally the control port given on the command line.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file looked up in the working directory (extension optional)
pub const CONFIG_FILE: &str = "ftserver";
/// Prefix for environment overrides, e.g. `FTSERVER_CONNECT_ATTEMPTS=5`
pub const ENV_PREFIX: &str = "FTSERVER";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_SERVER_ROOT: &str = ".";
const DEFAULT_CONNECT_ATTEMPTS: u32 = 10;
const DEFAULT_CONNECT_RETRY_DELAY_MS: u64 = 100;

/// Server configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Interface the control listener binds to
    pub bind_address: String,

    /// Port for control connections
    pub control_port: u16,

    /// Directory whose regular files are listed and served
    pub server_root: PathBuf,

    /// Outbound data connection attempts before giving up
    pub connect_attempts: u32,

    /// Pause between data connection attempts
    pub connect_retry_delay_ms: u64,

    /// Per-packet read/write limit in seconds; 0 waits forever
    pub io_timeout_secs: u64,

    /// Whether transport failures inside a session stop the server
    pub abort_on_transport_error: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            control_port: 0,
            server_root: PathBuf::from(DEFAULT_SERVER_ROOT),
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_retry_delay_ms: DEFAULT_CONNECT_RETRY_DELAY_MS,
            io_timeout_secs: 0,
            abort_on_transport_error: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration for a server listening on `control_port`
    pub fn load(control_port: u16) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("server_root", DEFAULT_SERVER_ROOT)?
            .set_default("connect_attempts", i64::from(DEFAULT_CONNECT_ATTEMPTS))?
            .set_default(
                "connect_retry_delay_ms",
                DEFAULT_CONNECT_RETRY_DELAY_MS as i64,
            )?
            .set_default("io_timeout_secs", 0i64)?
            .set_default("abort_on_transport_error", true)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override("control_port", i64::from(control_port))?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.control_port == 0 {
            return Err(ConfigError::Message("Control port cannot be 0".into()));
        }

        if self.connect_attempts == 0 {
            return Err(ConfigError::Message(
                "connect_attempts must be greater than 0".into(),
            ));
        }

        if self.server_root.as_os_str().is_empty() {
            return Err(ConfigError::Message("server_root cannot be empty".into()));
        }

        Ok(())
    }

    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    pub fn connect_retry_delay(&self) -> Duration {
        Duration::from_millis(self.connect_retry_delay_ms)
    }

    /// `None` when blocking calls may wait indefinitely
    pub fn io_timeout(&self) -> Option<Duration> {
        (self.io_timeout_secs > 0).then(|| Duration::from_secs(self.io_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_applies_defaults_and_port() {
        let config = ServerConfig::load(30021).unwrap();
        assert_eq!(config.control_port, 30021);
        assert_eq!(config.connect_attempts, 10);
        assert_eq!(config.connect_retry_delay(), Duration::from_millis(100));
        assert_eq!(config.io_timeout(), None);
        assert!(config.abort_on_transport_error);
        assert_eq!(config.control_socket(), "0.0.0.0:30021");
    }

    #[test]
    fn test_load_rejects_port_zero() {
        assert!(ServerConfig::load(0).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = ServerConfig {
            control_port: 2121,
            connect_attempts: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_io_timeout() {
        let config = ServerConfig {
            io_timeout_secs: 30,
            ..ServerConfig::default()
        };
        assert_eq!(config.io_timeout(), Some(Duration::from_secs(30)));
    }
}
