//! Client configuration from the environment.
//!
//! Every knob has a default; `LAPAKBENZ_*` variables override them.

use std::time::Duration;

use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://mbapi.dswip.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// The one header carrying the raw credential on every request.
pub const AUTH_HEADER: &str = "X-auth-token";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Whole-request budget; exceeding it fails the call like a network error.
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Defaults pointed at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] unless `base_url` is an
    /// absolute `http`/`https` URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        })
    }

    /// Read `LAPAKBENZ_BASE_URL`, `LAPAKBENZ_TIMEOUT_SECS` and
    /// `LAPAKBENZ_CONNECT_TIMEOUT_SECS`. Unparseable numbers fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a malformed base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("LAPAKBENZ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned());
        let mut config = Self::new(&base_url)?;
        config.timeout = Duration::from_secs(env_parse("LAPAKBENZ_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS));
        config.connect_timeout =
            Duration::from_secs(env_parse("LAPAKBENZ_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS));
        Ok(config)
    }

    /// Same timeouts, different server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a malformed base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { url: raw.to_owned(), reason };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("not a base URL".to_owned()));
    }
    Ok(url)
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
