//! Application configuration parsed from environment variables.

use std::path::PathBuf;

use tracing::warn;

use crate::favorites::FAVORITES_STORAGE_KEY;

pub const DEFAULT_API_BASE_URL: &str = "https://rickandmortyapi.com/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DATA_DIR_NAME: &str = "rickdex";

/// Errors produced while building configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(String),

    /// No data directory was configured and the platform has none.
    #[error("no data directory: set RICKDEX_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeouts: RequestTimeouts,
    pub data_dir: PathBuf,
    pub favorites_key: String,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `RICKDEX_API_BASE_URL`: default `https://rickandmortyapi.com/api`
    /// - `RICKDEX_REQUEST_TIMEOUT_SECS`: default 30
    /// - `RICKDEX_CONNECT_TIMEOUT_SECS`: default 10
    /// - `RICKDEX_DATA_DIR`: default `<platform data dir>/rickdex`
    /// - `RICKDEX_FAVORITES_KEY`: default `rick-and-morty-favorites`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a malformed base URL, an empty favorites
    /// key, or when no data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = parse_base_url(
            std::env::var("RICKDEX_API_BASE_URL")
                .ok()
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL),
        )?;
        let timeouts = RequestTimeouts {
            request_secs: env_parse_u64("RICKDEX_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("RICKDEX_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let data_dir = match std::env::var_os("RICKDEX_DATA_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir().ok_or(ConfigError::NoDataDir)?.join(DATA_DIR_NAME),
        };
        let favorites_key = parse_favorites_key(std::env::var("RICKDEX_FAVORITES_KEY").ok().as_deref())?;

        Ok(Self { api_base_url, timeouts, data_dir, favorites_key })
    }

    /// Apply a command-line base URL override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `raw` is not an http(s) URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    raw.parse::<u64>().unwrap_or_else(|_| {
        warn!(key, value = %raw, default, "ignoring unparsable config value");
        default
    })
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Parse(format!("RICKDEX_API_BASE_URL must be an http(s) URL, got '{raw}'")));
    }
    Ok(trimmed.to_string())
}

fn parse_favorites_key(raw: Option<&str>) -> Result<String, ConfigError> {
    match raw {
        None => Ok(FAVORITES_STORAGE_KEY.to_string()),
        Some(key) if key.trim().is_empty() => Err(ConfigError::Parse("RICKDEX_FAVORITES_KEY must not be empty".into())),
        Some(key) => Ok(key.to_string()),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
