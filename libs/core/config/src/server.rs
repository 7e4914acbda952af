use crate::{env_or_default, env_parse_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on reading a request body
    pub read_timeout: Duration,
    /// Upper bound on producing the whole response
    pub write_timeout: Duration,
    /// How long an idle keep-alive connection may linger
    pub idle_timeout: Duration,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            ..Self::default()
        }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - APP_HOST: defaults to Ipv4Addr::UNSPECIFIED (0.0.0.0 - all interfaces)
    /// - APP_PORT: defaults to 8080
    /// - APP_READ_TIMEOUT_SECS / APP_WRITE_TIMEOUT_SECS / APP_IDLE_TIMEOUT_SECS: 5 / 10 / 120
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("APP_HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse_or_default("APP_PORT", "8080")?;
        let read_timeout = env_parse_or_default("APP_READ_TIMEOUT_SECS", "5")?;
        let write_timeout = env_parse_or_default("APP_WRITE_TIMEOUT_SECS", "10")?;
        let idle_timeout = env_parse_or_default("APP_IDLE_TIMEOUT_SECS", "120")?;

        Ok(Self {
            host,
            port,
            read_timeout: Duration::from_secs(read_timeout),
            write_timeout: Duration::from_secs(write_timeout),
            idle_timeout: Duration::from_secs(idle_timeout),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(120),
        }
    }
}
