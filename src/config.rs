// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Strava REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://www.strava.com/api/v3";
/// Default Strava OAuth token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// Refresh token used to seed credentials when no token file exists yet
    pub strava_refresh_token: Option<String>,
    /// Where the current OAuth grant is persisted
    pub token_file: PathBuf,
    /// Strava REST API base URL
    pub api_base_url: String,
    /// Strava OAuth token endpoint
    pub token_url: String,
    /// Server port
    pub port: u16,
    /// Activities requested per listing page
    pub page_size: u32,
    /// Upper bound on listing pages scanned per search
    pub max_pages: u32,
    /// Per-request timeout for every Strava call
    pub request_timeout: Duration,
    /// Refresh this many seconds before the access token expires
    pub token_refresh_margin_secs: i64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            strava_refresh_token: Some("test_refresh_token".to_string()),
            token_file: PathBuf::from("strava_tokens.json"),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            port: 8080,
            page_size: 30,
            max_pages: 100,
            request_timeout: Duration::from_secs(30),
            token_refresh_margin_secs: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Tests use this instead of mutating the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut required = |key: &'static str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };
        let strava_client_id = required("STRAVA_CLIENT_ID")?;
        let strava_client_secret = required("STRAVA_CLIENT_SECRET")?;

        let strava_refresh_token = get("STRAVA_REFRESH_TOKEN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let page_size: u32 = parse_or(&mut get, "STRAVA_PAGE_SIZE", 30)?;
        if page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "STRAVA_PAGE_SIZE",
                value: "0".to_string(),
            });
        }
        let max_pages: u32 = parse_or(&mut get, "STRAVA_MAX_PAGES", 100)?;
        if max_pages == 0 {
            return Err(ConfigError::Invalid {
                key: "STRAVA_MAX_PAGES",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            strava_client_id,
            strava_client_secret,
            strava_refresh_token,
            token_file: get("STRAVA_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("strava_tokens.json")),
            api_base_url: get("STRAVA_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            token_url: get("STRAVA_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            port: parse_or(&mut get, "PORT", 8080)?,
            page_size,
            max_pages,
            request_timeout: Duration::from_secs(parse_or(&mut get, "REQUEST_TIMEOUT_SECS", 30)?),
            token_refresh_margin_secs: parse_or(&mut get, "TOKEN_REFRESH_MARGIN_SECS", 0)?,
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_or<F, T>(get: &mut F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl FnMut(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let config = Config::from_env_with(lookup(&[
            ("STRAVA_CLIENT_ID", "test_id"),
            ("STRAVA_CLIENT_SECRET", " test_secret \n"),
        ]))
        .expect("Config should load");

        assert_eq!(config.strava_client_id, "test_id");
        assert_eq!(config.strava_client_secret, "test_secret");
        assert_eq!(config.strava_refresh_token, None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.page_size, 30);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.token_file, PathBuf::from("strava_tokens.json"));
        assert_eq!(config.token_refresh_margin_secs, 0);
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_env_with(lookup(&[
            ("STRAVA_CLIENT_ID", "id"),
            ("STRAVA_CLIENT_SECRET", "secret"),
            ("STRAVA_REFRESH_TOKEN", "refresh"),
            ("STRAVA_API_BASE_URL", "http://localhost:9000/api/"),
            ("STRAVA_PAGE_SIZE", "50"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("TOKEN_REFRESH_MARGIN_SECS", "60"),
        ]))
        .expect("Config should load");

        assert_eq!(config.strava_refresh_token.as_deref(), Some("refresh"));
        assert_eq!(config.api_base_url, "http://localhost:9000/api");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.token_refresh_margin_secs, 60);
    }

    #[test]
    fn test_missing_client_secret() {
        let err = Config::from_env_with(lookup(&[("STRAVA_CLIENT_ID", "id")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("STRAVA_CLIENT_SECRET")));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = Config::from_env_with(lookup(&[
            ("STRAVA_CLIENT_ID", "id"),
            ("STRAVA_CLIENT_SECRET", "secret"),
            ("STRAVA_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "STRAVA_PAGE_SIZE",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_numeric_port() {
        let err = Config::from_env_with(lookup(&[
            ("STRAVA_CLIENT_ID", "id"),
            ("STRAVA_CLIENT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
