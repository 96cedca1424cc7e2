//! Profile fetch task.
//!
//! DESIGN
//! ======
//! A dispatch marks the store `Loading` synchronously, captures the token,
//! and spawns one request on the tokio runtime. The caller gets a
//! `FetchHandle` back immediately; the task writes its result into the store
//! when it resolves, whether or not anyone awaits the handle.

#[cfg(test)]
#[path = "fetch_test.rs"]
mod fetch_test;

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::session::{FetchTicket, SessionStore};
use crate::error::SessionError;
use crate::net::api::{ApiError, BankApi};
use crate::net::types::UserProfile;

/// Terminal result of one profile fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Succeeded(UserProfile),
    /// Carries the message that was recorded in `SessionState::error`.
    Failed(String),
    /// Cancelled before its result was written; the store was not updated.
    Cancelled,
}

impl FetchOutcome {
    /// `Ok(Some(profile))` on success, `Ok(None)` when cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ProfileFetchFailed` with the recorded message on failure.
    pub fn into_result(self) -> Result<Option<UserProfile>, SessionError> {
        match self {
            Self::Succeeded(profile) => Ok(Some(profile)),
            Self::Failed(message) => Err(SessionError::ProfileFetchFailed(message)),
            Self::Cancelled => Ok(None),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Handle to an in-flight profile fetch.
///
/// Dropping the handle does not cancel the fetch.
#[derive(Debug)]
pub struct FetchHandle {
    id: u64,
    cancel: CancellationToken,
    join: JoinHandle<FetchOutcome>,
}

impl FetchHandle {
    /// Dispatch sequence number, increasing per store.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Cancel this fetch. Has no effect once the result has been written.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the fetch to resolve.
    pub async fn wait(self) -> FetchOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => FetchOutcome::Cancelled,
            Err(e) => {
                tracing::error!(error = %e, fetch_id = self.id, "profile fetch task panicked");
                FetchOutcome::Failed(format!("profile fetch task failed: {e}"))
            }
        }
    }
}

pub(crate) fn dispatch(store: &SessionStore, api: Arc<dyn BankApi>) -> FetchHandle {
    let ticket = store.begin_fetch();
    let id = ticket.id;
    let cancel = ticket.cancel.clone();
    tracing::debug!(fetch_id = id, has_token = ticket.token.is_some(), "profile fetch dispatched");

    let store = store.clone();
    let join = tokio::spawn(async move { run(store, api, ticket).await });
    FetchHandle { id, cancel, join }
}

pub(crate) fn failure_message(err: &ApiError) -> String {
    format!("Failed to fetch user profile: {err}")
}

async fn run(store: SessionStore, api: Arc<dyn BankApi>, ticket: FetchTicket) -> FetchOutcome {
    let result = match &ticket.token {
        None => Err(ApiError::MissingToken),
        Some(token) => {
            tokio::select! {
                biased;
                () = ticket.cancel.cancelled() => {
                    store.abandon_fetch(&ticket);
                    tracing::debug!(fetch_id = ticket.id, "profile fetch cancelled");
                    return FetchOutcome::Cancelled;
                }
                result = api.fetch_profile(token) => result,
            }
        }
    };

    let write = result.map_err(|e| failure_message(&e));
    if !store.resolve_fetch(&ticket, write.clone()) {
        store.abandon_fetch(&ticket);
        tracing::debug!(fetch_id = ticket.id, "profile fetch resolved after cancellation; discarded");
        return FetchOutcome::Cancelled;
    }

    match write {
        Ok(profile) => {
            tracing::info!(fetch_id = ticket.id, user_name = ?profile.user_name, "profile fetch succeeded");
            FetchOutcome::Succeeded(profile)
        }
        Err(message) => {
            tracing::warn!(fetch_id = ticket.id, error = %message, "profile fetch failed; session deauthenticated");
            FetchOutcome::Failed(message)
        }
    }
}
