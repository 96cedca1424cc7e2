//! Client configuration parsed from environment variables.

use crate::state::session::LogoutPolicy;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ApiTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the API, without trailing slash (e.g. `http://localhost:3001/api/v1`).
    pub api_base_url: String,
    pub timeouts: ApiTimeouts,
    pub logout_policy: LogoutPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: ApiTimeouts::default(),
            logout_policy: LogoutPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `ARGENT_API_BASE_URL`: default `http://localhost:3001/api/v1`
    /// - `ARGENT_REQUEST_TIMEOUT_SECS`: default 30
    /// - `ARGENT_CONNECT_TIMEOUT_SECS`: default 10
    /// - `ARGENT_LOGOUT_POLICY`: `keep` (default) or `cancel`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or logout policy is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = match std::env::var("ARGENT_API_BASE_URL") {
            Ok(raw) => normalize_base_url(&raw)?,
            Err(_) => DEFAULT_API_BASE_URL.to_owned(),
        };
        let timeouts = ApiTimeouts {
            request_secs: env_parse_u64("ARGENT_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("ARGENT_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let logout_policy = parse_logout_policy(std::env::var("ARGENT_LOGOUT_POLICY").ok().as_deref())?;

        Ok(Self { api_base_url, timeouts, logout_policy })
    }

    /// Replace the base URL, validating it the same way `from_env` does.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is not `http://` or `https://`.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let has_host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    if !has_host {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn parse_logout_policy(raw: Option<&str>) -> Result<LogoutPolicy, ConfigError> {
    match raw.map(str::trim).unwrap_or("keep") {
        "keep" => Ok(LogoutPolicy::KeepInFlight),
        "cancel" => Ok(LogoutPolicy::CancelInFlight),
        other => Err(ConfigError::InvalidValue { key: "ARGENT_LOGOUT_POLICY", value: other.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
