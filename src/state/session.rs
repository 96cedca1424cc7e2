//! Session store: token, profile, and profile-fetch bookkeeping.
//!
//! DESIGN
//! ======
//! `SessionStore` is a cheap `Clone` handle passed explicitly to whatever
//! needs it. State lives in a `watch` channel, so every mutation is applied
//! atomically under the channel lock and renderers can `subscribe` to
//! re-evaluate route guards on change.
//!
//! Transitions:
//! - `set_token`: Unauthenticated -> Authenticated.
//! - `logout`: any -> Unauthenticated, clears token and user.
//! - profile fetch failure: Authenticated -> Unauthenticated, token kept.
//!
//! TRADE-OFFS
//! ==========
//! With `LogoutPolicy::KeepInFlight` a fetch that resolves after `logout`
//! still writes `user`/`status` (last write wins). `CancelInFlight` cancels
//! every fetch dispatched before the logout instead; the cancellation check
//! runs under the same lock as the write, so a cancelled fetch never lands.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::fetch::{self, FetchHandle};
use crate::net::api::BankApi;
use crate::net::types::{BearerToken, UserProfile};

// =============================================================================
// STATE
// =============================================================================

/// Lifecycle of the most recently resolved profile fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl FetchStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// What `logout` does to profile fetches that are still in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogoutPolicy {
    /// Leave them running; their results still land on the store.
    #[default]
    KeepInFlight,
    /// Cancel them; their results are discarded.
    CancelInFlight,
}

/// Snapshot of the client session.
///
/// `is_authenticated` implies `token.is_some()`. The converse does not hold
/// after a failed profile fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<BearerToken>,
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    pub status: FetchStatus,
    /// Message from the last failed profile fetch.
    pub error: Option<String>,
}

// =============================================================================
// STORE
// =============================================================================

/// Handle to the shared session state. Clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: watch::Sender<SessionState>,
    policy: LogoutPolicy,
    /// Parent of every fetch dispatched since the last cancelling logout.
    epoch: Mutex<CancellationToken>,
    dispatch_seq: AtomicU64,
}

/// Per-dispatch bookkeeping handed to the fetch task.
#[derive(Debug)]
pub(crate) struct FetchTicket {
    pub id: u64,
    pub token: Option<BearerToken>,
    pub cancel: CancellationToken,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(LogoutPolicy::default())
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.inner.state.borrow())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create a store with empty, unauthenticated, idle state.
    #[must_use]
    pub fn new(policy: LogoutPolicy) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            inner: Arc::new(StoreInner {
                state,
                policy,
                epoch: Mutex::new(CancellationToken::new()),
                dispatch_seq: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated
    }

    /// Receiver notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn logout_policy(&self) -> LogoutPolicy {
        self.inner.policy
    }

    /// Store a freshly issued token and mark the session authenticated.
    pub fn set_token(&self, token: BearerToken) {
        self.inner.state.send_modify(|s| {
            s.token = Some(token);
            s.is_authenticated = true;
        });
        tracing::debug!("session token set");
    }

    /// Clear token and profile and mark the session unauthenticated. Idempotent.
    pub fn logout(&self) {
        let cancel_in_flight = self.inner.policy == LogoutPolicy::CancelInFlight;
        if cancel_in_flight {
            let mut epoch = self.epoch();
            epoch.cancel();
            *epoch = CancellationToken::new();
        }
        self.inner.state.send_modify(|s| {
            s.token = None;
            s.user = None;
            s.is_authenticated = false;
            if cancel_in_flight && s.status == FetchStatus::Loading {
                s.status = FetchStatus::Idle;
            }
        });
        tracing::debug!(cancel_in_flight, "session logged out");
    }

    /// Dispatch a profile fetch for the current token. Must be called from
    /// within a tokio runtime.
    pub fn fetch_user_profile(&self, api: Arc<dyn BankApi>) -> FetchHandle {
        fetch::dispatch(self, api)
    }

    // -------------------------------------------------------------------------
    // fetch transitions
    // -------------------------------------------------------------------------

    /// Mark a fetch as started and capture the token it will present.
    pub(crate) fn begin_fetch(&self) -> FetchTicket {
        let cancel = self.epoch().child_token();
        let id = self.inner.dispatch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let mut token: Option<BearerToken> = None;
        self.inner.state.send_modify(|s| {
            token.clone_from(&s.token);
            s.status = FetchStatus::Loading;
            s.error = None;
        });
        FetchTicket { id, token, cancel }
    }

    /// Apply a fetch result. Returns `false` if the fetch was cancelled and
    /// nothing was written.
    pub(crate) fn resolve_fetch(&self, ticket: &FetchTicket, result: Result<UserProfile, String>) -> bool {
        self.inner.state.send_if_modified(|s| {
            if ticket.cancel.is_cancelled() {
                return false;
            }
            match result {
                Ok(profile) => {
                    s.user = Some(profile);
                    s.status = FetchStatus::Succeeded;
                    s.error = None;
                }
                Err(message) => {
                    s.status = FetchStatus::Failed;
                    s.error = Some(message);
                    s.is_authenticated = false;
                }
            }
            true
        })
    }

    /// Settle a cancelled fetch: if nothing newer was dispatched and the
    /// store still shows it loading, return to idle.
    pub(crate) fn abandon_fetch(&self, ticket: &FetchTicket) {
        let latest = self.inner.dispatch_seq.load(Ordering::SeqCst);
        self.inner.state.send_if_modified(|s| {
            if latest == ticket.id && s.status == FetchStatus::Loading {
                s.status = FetchStatus::Idle;
                return true;
            }
            false
        });
    }

    fn epoch(&self) -> MutexGuard<'_, CancellationToken> {
        self.inner
            .epoch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
