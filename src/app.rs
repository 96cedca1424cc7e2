//! Root composition of the session core.
//!
//! DESIGN
//! ======
//! `AppContext` is what a UI shell holds and clones into each view: the
//! session store, the API client, and the route table. All inner fields are
//! `Arc`-backed or cheap to clone, so every clone sees the same session.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::SessionError;
use crate::net::api::{BankApi, HttpBankApi};
use crate::routes::guard::PendingNavigation;
use crate::routes::{Navigation, RouteTable};
use crate::services::auth::{self, LoginOutcome};
use crate::services::profile;
use crate::state::fetch::FetchHandle;
use crate::state::session::{LogoutPolicy, SessionState, SessionStore};

#[derive(Clone)]
pub struct AppContext {
    pub store: SessionStore,
    pub api: Arc<dyn BankApi>,
    pub routes: Arc<RouteTable>,
}

impl AppContext {
    /// Build a context talking HTTP to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SessionError> {
        let api = HttpBankApi::new(config)?;
        tracing::debug!(base_url = api.base_url(), policy = ?config.logout_policy, "session context created");
        Ok(Self::with_api(Arc::new(api), config.logout_policy))
    }

    #[must_use]
    pub fn with_api(api: Arc<dyn BankApi>, policy: LogoutPolicy) -> Self {
        Self { store: SessionStore::new(policy), api, routes: Arc::new(RouteTable::default()) }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.store.snapshot()
    }

    /// Resolve a navigation against the current session snapshot.
    #[must_use]
    pub fn navigate(&self, raw: &str) -> Navigation {
        self.routes.resolve(&self.store.snapshot(), raw)
    }

    /// # Errors
    ///
    /// See [`auth::login`].
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        pending: Option<&PendingNavigation>,
    ) -> Result<LoginOutcome, SessionError> {
        auth::login(&self.store, &self.api, email, password, pending).await
    }

    pub fn logout(&self) {
        auth::logout(&self.store);
    }

    /// # Errors
    ///
    /// See [`profile::update_user_name`].
    pub async fn update_user_name(&self, user_name: &str) -> Result<FetchHandle, SessionError> {
        profile::update_user_name(&self.store, &self.api, user_name).await
    }

    pub fn refresh_profile(&self) -> FetchHandle {
        profile::refresh_profile(&self.store, &self.api)
    }
}
