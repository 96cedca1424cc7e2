//! Argent Bank session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! Client-side authentication state for the Argent Bank frontend: an
//! in-memory session store, the profile fetch task that feeds it, the route
//! guard that protects `/user`, and the login/profile flows that drive them
//! against the Argent Bank REST API. Rendering is left to the caller, which
//! reads snapshots from the store and dispatches into the flows.

pub mod app;
pub mod config;
pub mod error;
pub mod net;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::AppContext;
pub use config::ClientConfig;
pub use error::SessionError;
pub use net::api::{ApiError, BankApi, HttpBankApi};
pub use net::types::{BearerToken, Credentials, UserProfile};
pub use routes::guard::{GuardDecision, Location, PendingNavigation, guard};
pub use state::fetch::{FetchHandle, FetchOutcome};
pub use state::session::{FetchStatus, LogoutPolicy, SessionState, SessionStore};
