//! REST client for the Argent Bank API.
//!
//! DESIGN
//! ======
//! `BankApi` is the seam between the session core and the network: the store
//! and flows only ever see this trait, so tests swap in a scripted mock and
//! the binary uses `HttpBankApi`. Response bodies are parsed by free
//! functions that never touch the network.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is an `ApiError`. Callers decide what reaches the user:
//! login collapses them into one generic message, profile fetch records the
//! message in the store.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::types::{ApiEnvelope, BearerToken, Credentials, LoginBody, UpdateUserNameRequest, UserProfile};
use crate::config::ClientConfig;

/// Errors produced by API client operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Status { status: u16, message: Option<String> },

    /// The response body was not the expected JSON shape.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The response envelope lacked a required field.
    #[error("response missing `{0}`")]
    MissingField(&'static str),

    /// An authenticated call was attempted without a bearer token.
    #[error("no bearer token available")]
    MissingToken,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// TRAIT
// =============================================================================

/// Backend operations the session core depends on.
#[async_trait]
pub trait BankApi: Send + Sync {
    /// `POST /user/login`: exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<BearerToken, ApiError>;

    /// `POST /user/profile`: fetch the profile of the token's owner.
    async fn fetch_profile(&self, token: &BearerToken) -> Result<UserProfile, ApiError>;

    /// `PUT /user/profile`: change the username of the token's owner.
    async fn update_user_name(&self, token: &BearerToken, user_name: &str) -> Result<UserProfile, ApiError>;
}

// =============================================================================
// HTTP IMPLEMENTATION
// =============================================================================

pub struct HttpBankApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBankApi {
    /// Build a client for the configured base URL and timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.api_base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn read_success_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), message: error_message(&text) });
        }
        Ok(text)
    }
}

#[async_trait]
impl BankApi for HttpBankApi {
    async fn login(&self, credentials: &Credentials) -> Result<BearerToken, ApiError> {
        let response = self
            .http
            .post(login_endpoint(&self.base_url))
            .json(credentials)
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let text = Self::read_success_body(response).await?;
        parse_login_response(&text)
    }

    async fn fetch_profile(&self, token: &BearerToken) -> Result<UserProfile, ApiError> {
        let response = self
            .http
            .post(profile_endpoint(&self.base_url))
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let text = Self::read_success_body(response).await?;
        parse_profile_response(&text)
    }

    async fn update_user_name(&self, token: &BearerToken, user_name: &str) -> Result<UserProfile, ApiError> {
        let response = self
            .http
            .put(profile_endpoint(&self.base_url))
            .bearer_auth(token.as_str())
            .json(&UpdateUserNameRequest { user_name })
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let text = Self::read_success_body(response).await?;
        parse_profile_response(&text)
    }
}

// =============================================================================
// ENDPOINTS + PARSING
// =============================================================================

fn login_endpoint(base_url: &str) -> String {
    format!("{base_url}/user/login")
}

fn profile_endpoint(base_url: &str) -> String {
    format!("{base_url}/user/profile")
}

fn decode_envelope<T: DeserializeOwned>(text: &str) -> Result<ApiEnvelope<T>, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Best-effort extraction of `message` from an error response body.
fn error_message(text: &str) -> Option<String> {
    serde_json::from_str::<ApiEnvelope<serde_json::Value>>(text)
        .ok()
        .and_then(|env| env.message)
        .filter(|m| !m.is_empty())
}

pub(crate) fn parse_login_response(text: &str) -> Result<BearerToken, ApiError> {
    let envelope: ApiEnvelope<LoginBody> = decode_envelope(text)?;
    let body = envelope.body.ok_or(ApiError::MissingField("body"))?;
    body.token
        .and_then(BearerToken::new)
        .ok_or(ApiError::MissingField("body.token"))
}

pub(crate) fn parse_profile_response(text: &str) -> Result<UserProfile, ApiError> {
    let envelope: ApiEnvelope<UserProfile> = decode_envelope(text)?;
    envelope.body.ok_or(ApiError::MissingField("body"))
}
