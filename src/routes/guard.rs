//! Route guard for protected views.
//!
//! SYSTEM CONTEXT
//! ==============
//! Consulted on every render of a protected view. It reads only the
//! authentication flag and never mutates session state: unauthenticated
//! navigations are redirected to `/sign-in` carrying the requested location
//! so the login flow can send the user back afterwards.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::state::session::SessionState;

pub const SIGN_IN_PATH: &str = "/sign-in";
pub const DEFAULT_AFTER_LOGIN_PATH: &str = "/user";

/// A navigation target split the way a browser location is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    /// Always starts with `/`.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment including the leading `#`, or empty.
    pub hash: String,
}

impl Location {
    /// Parse `"/user?tab=savings#top"` style targets. A missing leading slash
    /// is added; an empty path becomes `/`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (rest, hash) = match raw.find('#') {
            Some(i) => (&raw[..i], &raw[i..]),
            None => (raw, ""),
        };
        let (path, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        let pathname = if path.starts_with('/') { path.to_owned() } else { format!("/{path}") };
        Self { pathname, search: search.to_owned(), hash: hash.to_owned() }
    }

    /// Pathname with trailing slashes removed (`/user/` -> `/user`, `/` stays `/`).
    #[must_use]
    pub fn normalized_path(&self) -> &str {
        let trimmed = self.pathname.trim_end_matches('/');
        if trimmed.is_empty() { "/" } else { trimmed }
    }

    /// Full target as it would appear in the address bar.
    #[must_use]
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Location the user tried to reach before being sent to sign in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingNavigation {
    pub from: Location,
}

impl PendingNavigation {
    /// Where to go once signed in. Never the sign-in page itself.
    #[must_use]
    pub fn return_to(&self) -> Location {
        if self.from.normalized_path() == SIGN_IN_PATH {
            return Location::parse(DEFAULT_AFTER_LOGIN_PATH);
        }
        self.from.clone()
    }
}

/// Destination after a successful login.
#[must_use]
pub fn post_login_destination(pending: Option<&PendingNavigation>) -> Location {
    pending.map_or_else(|| Location::parse(DEFAULT_AFTER_LOGIN_PATH), PendingNavigation::return_to)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the requested protected content.
    Admit,
    /// Navigate to `to`, carrying the original request.
    Redirect { to: Location, pending: PendingNavigation },
}

impl GuardDecision {
    #[must_use]
    pub fn is_admit(&self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Admit when authenticated, otherwise redirect to sign-in. No token expiry
/// or server re-validation is involved.
#[must_use]
pub fn guard(is_authenticated: bool, location: &Location) -> GuardDecision {
    if is_authenticated {
        return GuardDecision::Admit;
    }
    GuardDecision::Redirect {
        to: Location::parse(SIGN_IN_PATH),
        pending: PendingNavigation { from: location.clone() },
    }
}

/// [`guard`] applied to a session snapshot.
#[must_use]
pub fn guard_session(state: &SessionState, location: &Location) -> GuardDecision {
    guard(state.is_authenticated, location)
}
