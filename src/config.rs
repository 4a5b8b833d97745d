//! Gateway configuration
//!
//! All settings are loaded once at startup. The network/filesystem layout is
//! fixed for the camera deployment; only the credential pair is sourced from
//! the environment (FTP_USER, FTP_PASS).

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Complete gateway configuration, invariant for the process lifetime.
#[derive(Debug, Deserialize, Clone)]
pub struct GatewayConfig {
    /// IP address to bind the FTP control connection
    pub bind_address: String,

    /// Port for the FTP control connection
    pub port: u16,

    /// Destination for uploaded files, also the account's home directory
    pub save_dir: PathBuf,

    /// Directory holding ftp_server.log
    pub log_dir: PathBuf,

    /// Account username (environment: FTP_USER)
    pub user: String,

    /// Account secret (environment: FTP_PASS, required)
    pub pass: String,

    /// Global cap on simultaneous connections
    pub max_total_connections: usize,

    /// Cap on simultaneous connections from one source IP
    pub max_connections_per_source: usize,

    /// Banner announced to clients on connect
    pub banner: String,
}

impl GatewayConfig {
    /// Load configuration from coded defaults with FTP_* environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", "0.0.0.0")?
            .set_default("port", 21)?
            .set_default("save_dir", "/app/images")?
            .set_default("log_dir", "/app/logs")?
            .set_default("user", "camera")?
            .set_default("pass", "")?
            .set_default("max_total_connections", 256)?
            .set_default("max_connections_per_source", 10)?
            .set_default("banner", "Camera FTP service ready.")?
            .add_source(Environment::with_prefix("FTP"))
            .build()?;

        let config: GatewayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // An unset or blank secret must never silently become "no password"
        if self.pass.trim().is_empty() {
            return Err(ConfigError::Message(
                "FTP_PASS must be set to a non-empty secret".into(),
            ));
        }

        if self.user.trim().is_empty() {
            return Err(ConfigError::Message("FTP_USER cannot be blank".into()));
        }

        if self.max_total_connections == 0 {
            return Err(ConfigError::Message(
                "max_total_connections must be greater than 0".into(),
            ));
        }

        if self.max_connections_per_source == 0 {
            return Err(ConfigError::Message(
                "max_connections_per_source must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and control port as a socket address string.
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GatewayConfig {
        GatewayConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 2121,
            save_dir: PathBuf::from("/tmp/images"),
            log_dir: PathBuf::from("/tmp/logs"),
            user: "camera".to_string(),
            pass: "secret".to_string(),
            max_total_connections: 256,
            max_connections_per_source: 10,
            banner: "test".to_string(),
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn blank_secret_is_rejected() {
        let mut config = test_config();
        config.pass = String::new();
        assert!(config.validate().is_err());

        config.pass = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_connection_caps_are_rejected() {
        let mut config = test_config();
        config.max_total_connections = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.max_connections_per_source = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn control_socket_joins_address_and_port() {
        assert_eq!(test_config().control_socket(), "127.0.0.1:2121");
    }
}
