use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;
use url::Url;

pub const DEFAULT_DOCS_BASE_URL: &str = "https://hono.dev";
pub const DEFAULT_DOCS_CONTENT_BASE_URL: &str =
    "https://raw.githubusercontent.com/honojs/website/main";
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 3600;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub bind_port: u16,
    pub docs_base_url: String,
    pub docs_content_base_url: String,
    pub cache_ttl_seconds: u64,
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BIND_PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
    #[error("{0} must be an absolute http(s) URL")]
    InvalidBaseUrl(&'static str),
    #[error("CACHE_TTL_SECONDS must be a positive integer")]
    InvalidCacheTtl,
    #[error("FETCH_TIMEOUT_SECS must be a positive integer")]
    InvalidFetchTimeout,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = read("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let bind_port = read("BIND_PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(8080);
        let docs_base_url = parse_base_url(
            "DOCS_BASE_URL",
            read("DOCS_BASE_URL").as_deref().unwrap_or(DEFAULT_DOCS_BASE_URL),
        )?;
        let docs_content_base_url = parse_base_url(
            "DOCS_CONTENT_BASE_URL",
            read("DOCS_CONTENT_BASE_URL")
                .as_deref()
                .unwrap_or(DEFAULT_DOCS_CONTENT_BASE_URL),
        )?;
        let cache_ttl_seconds = parse_positive(
            read("CACHE_TTL_SECONDS"),
            DEFAULT_CACHE_TTL_SECONDS,
            ConfigError::InvalidCacheTtl,
        )?;
        let fetch_timeout_secs = parse_positive(
            read("FETCH_TIMEOUT_SECS"),
            DEFAULT_FETCH_TIMEOUT_SECS,
            ConfigError::InvalidFetchTimeout,
        )?;

        let config = Self {
            bind_addr,
            bind_port,
            docs_base_url,
            docs_content_base_url,
            cache_ttl_seconds,
            fetch_timeout_secs,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.bind_port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Expired cache entries are swept once per TTL period.
    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

fn parse_base_url(name: &'static str, value: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(value).map_err(|_| ConfigError::InvalidBaseUrl(name))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl(name));
    }

    Ok(value.trim_end_matches('/').to_string())
}

fn parse_positive(
    value: Option<String>,
    default: u64,
    error: ConfigError,
) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(error),
        },
    }
}
