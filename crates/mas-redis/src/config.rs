//! Redis connection configuration
//!
//! Configuration sources are merged with Figment in this order (later
//! sources override earlier): defaults, an optional TOML file, then
//! environment variables prefixed `MAS_REDIS_` (e.g. `MAS_REDIS_HOST`,
//! `MAS_REDIS_PORT`).

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mas_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "MAS_REDIS_";

/// Redis connection parameters
///
/// When `url` is set it wins over the individual fields; otherwise the URL is
/// assembled from host, port, password, and database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Full connection URL, overriding the individual fields when set
    pub url: Option<String>,
    /// Redis server hostname
    pub host: String,
    /// Redis server port
    pub port: u16,
    /// Optional password
    pub password: Option<String>,
    /// Logical database index
    pub database: i64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            database: 0,
        }
    }
}

impl RedisConfig {
    /// Create a configuration from a full connection URL
    pub fn from_url<S: Into<String>>(url: S) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Create a configuration for a host and port
    pub fn with_host_port<S: Into<String>>(host: S, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Load configuration from defaults and environment variables
    pub fn load() -> Result<Self> {
        Self::extract(Figment::new().merge(Serialized::defaults(Self::default())))
    }

    /// Load configuration from defaults, a TOML file, and environment
    /// variables
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Self::default()))
                .merge(Toml::file(path.as_ref())),
        )
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .merge(Env::prefixed(CONFIG_ENV_PREFIX))
            .extract()
            .map_err(|e| Error::config(format!("failed to extract redis configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// The URL handed to the Redis client
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let auth = self
            .password
            .as_ref()
            .map(|password| format!(":{password}@"))
            .unwrap_or_default();
        format!(
            "redis://{auth}{host}:{port}/{database}",
            host = self.host,
            port = self.port,
            database = self.database
        )
    }

    /// Password-free address for log messages
    pub fn address(&self) -> String {
        match &self.url {
            Some(url) => url
                .rsplit('@')
                .next()
                .unwrap_or(url.as_str())
                .to_string(),
            None => format!("{}:{}", self.host, self.port),
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.url.is_none() && self.port == 0 {
            return Err(Error::config("redis port cannot be 0"));
        }
        if self.database < 0 {
            return Err(Error::config("redis database index cannot be negative"));
        }
        Ok(())
    }
}
