//! Wire DTOs for the Argent Bank API and the validated values built from them.
//!
//! DESIGN
//! ======
//! Every backend response is wrapped in the same `{status, message, body}`
//! envelope. The envelope is decoded loosely, then the interesting payload is
//! validated into a typed value (`BearerToken`, `UserProfile`) so nothing
//! downstream handles raw JSON.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// BEARER TOKEN
// =============================================================================

/// Opaque bearer credential returned by a successful login.
///
/// Never empty. The value is redacted from `Debug` output so snapshots can be
/// logged freely.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token, rejecting empty or whitespace-only strings.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Email + password pair submitted by the sign-in form.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Build credentials from raw form input. The email is trimmed; both
    /// fields must be non-empty.
    #[must_use]
    pub fn new(email: &str, password: &str) -> Option<Self> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { email: email.to_owned(), password: password.to_owned() })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// USER PROFILE
// =============================================================================

/// Profile record of the signed-in user, as returned by `POST /user/profile`.
///
/// All known fields are optional; fields the client does not model are kept
/// in `extra` so nothing the backend sends is silently dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Any additional fields present in the payload.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    /// Name shown in the "Welcome back" header: the username when set,
    /// otherwise first and last name, otherwise the empty string.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(user_name) = self.user_name.as_deref().filter(|s| !s.is_empty()) {
            return user_name.to_owned();
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        parts.join(" ")
    }
}

// =============================================================================
// ENVELOPE + REQUEST BODIES
// =============================================================================

/// Common response envelope: `{ "status": 200, "message": "...", "body": ... }`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub message: Option<String>,
    pub body: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateUserNameRequest<'a> {
    pub user_name: &'a str,
}
