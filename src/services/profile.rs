//! Profile maintenance: username edits and explicit refreshes.

use std::sync::Arc;

use crate::error::SessionError;
use crate::net::api::BankApi;
use crate::state::fetch::FetchHandle;
use crate::state::session::SessionStore;

pub(crate) fn validate_user_name(raw: &str) -> Result<&str, SessionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionError::EmptyUserName);
    }
    Ok(trimmed)
}

/// Change the username, then re-fetch the profile so the store reflects it.
///
/// The `PUT` response body is not written to the store; the follow-up fetch
/// is the single source of profile updates.
///
/// # Errors
///
/// `EmptyUserName` for blank input, `NotAuthenticated` without a token,
/// `ProfileUpdateFailed` if the backend rejects the change. Session state is
/// not modified on error.
pub async fn update_user_name(
    store: &SessionStore,
    api: &Arc<dyn BankApi>,
    user_name: &str,
) -> Result<FetchHandle, SessionError> {
    let user_name = validate_user_name(user_name)?;
    let token = store.snapshot().token.ok_or(SessionError::NotAuthenticated)?;

    if let Err(e) = api.update_user_name(&token, user_name).await {
        tracing::error!(error = %e, "error updating user name");
        return Err(SessionError::ProfileUpdateFailed(e));
    }

    tracing::info!(%user_name, "user name updated");
    Ok(store.fetch_user_profile(Arc::clone(api)))
}

/// Re-dispatch a profile fetch for the current token.
pub fn refresh_profile(store: &SessionStore, api: &Arc<dyn BankApi>) -> FetchHandle {
    store.fetch_user_profile(Arc::clone(api))
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
