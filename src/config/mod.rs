//! Configuration for PageCheck

mod fetch;
mod logging;
mod server;
mod storage;

pub use fetch::FetchConfig;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use server::ServerConfig;
pub use storage::StorageConfig;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default user agent for outbound page fetches
pub const DEFAULT_USER_AGENT: &str = "PageCheckBot/1.0 (+https://github.com/pagecheck)";

/// Main configuration, constructed once at process entry and passed into
/// components explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedded store configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Outbound fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration fields.
    ///
    /// Collects all validation errors and reports them together so the user
    /// can fix everything in one pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "server listen_addr '{}' is not a valid socket address",
                self.server.listen_addr
            ));
        }

        if self.fetch.timeout_secs == 0 {
            errors.push("fetch timeout_secs must be positive".to_string());
        }
        if self.fetch.connect_timeout_secs == 0 {
            errors.push("fetch connect_timeout_secs must be positive".to_string());
        }
        if self.fetch.user_agent.trim().is_empty() {
            errors.push("fetch user_agent must not be empty".to_string());
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            errors.push("storage data_dir must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            anyhow::bail!("Invalid configuration:\n  - {}", errors.join("\n  - "))
        }
    }

    /// Serialize the configuration to TOML, for `init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.server.listen_addr, config.server.listen_addr);
    }

    #[test]
    fn test_bad_listen_addr_rejected() {
        let mut config = Config::default();
        config.server.listen_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.fetch.timeout_secs = 0;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("timeout_secs"));
    }
}
