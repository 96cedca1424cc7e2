//! Login and logout flows.

use std::sync::Arc;

use crate::error::SessionError;
use crate::net::api::BankApi;
use crate::net::types::Credentials;
use crate::routes::guard::{Location, PendingNavigation, post_login_destination};
use crate::state::fetch::FetchHandle;
use crate::state::session::SessionStore;

/// Result of a successful login.
#[derive(Debug)]
pub struct LoginOutcome {
    /// Where the UI should navigate next.
    pub redirect_to: Location,
    /// Profile fetch dispatched right after the token was stored.
    pub profile_fetch: FetchHandle,
}

/// Exchange credentials for a token, store it, and dispatch a profile fetch.
///
/// `pending` is the location captured by the route guard, if the user was
/// redirected to sign in.
///
/// # Errors
///
/// `MissingCredentials` if either field is empty; `LoginFailed` for any
/// backend or transport failure. The session is left untouched on error.
pub async fn login(
    store: &SessionStore,
    api: &Arc<dyn BankApi>,
    email: &str,
    password: &str,
    pending: Option<&PendingNavigation>,
) -> Result<LoginOutcome, SessionError> {
    let credentials = Credentials::new(email, password).ok_or(SessionError::MissingCredentials)?;

    let token = match api.login(&credentials).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, email = %credentials.email, "login rejected");
            return Err(SessionError::LoginFailed);
        }
    };

    store.set_token(token);
    let profile_fetch = store.fetch_user_profile(Arc::clone(api));
    let redirect_to = post_login_destination(pending);
    tracing::info!(email = %credentials.email, redirect_to = %redirect_to.href(), "login succeeded");

    Ok(LoginOutcome { redirect_to, profile_fetch })
}

/// Sign the user out. Safe to call when already signed out.
pub fn logout(store: &SessionStore) {
    store.logout();
    tracing::info!("user logged out");
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
