//! Scripted `BankApi` used by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::net::api::{ApiError, BankApi};
use crate::net::types::{BearerToken, Credentials, UserProfile};

/// Scripted reply for the next `fetch_profile` call.
pub(crate) enum ProfileReply {
    Status(u16),
    /// Resolves when the test sends on the paired sender.
    Gated(oneshot::Receiver<Result<UserProfile, u16>>),
}

pub(crate) fn gated_reply() -> (oneshot::Sender<Result<UserProfile, u16>>, ProfileReply) {
    let (tx, rx) = oneshot::channel();
    (tx, ProfileReply::Gated(rx))
}

pub(crate) fn profile(user_name: &str) -> UserProfile {
    UserProfile {
        id: Some("64f1a2".into()),
        email: Some(format!("{}@argentbank.test", user_name.to_lowercase())),
        first_name: Some(user_name.into()),
        last_name: Some("Liddell".into()),
        user_name: Some(user_name.into()),
        ..UserProfile::default()
    }
}

pub(crate) fn token(raw: &str) -> BearerToken {
    BearerToken::new(raw).expect("test token should be non-empty")
}

pub(crate) struct MockBankApi {
    accepted: (String, String),
    issued_token: String,
    current: Mutex<UserProfile>,
    replies: Mutex<VecDeque<ProfileReply>>,
    update_failure: Mutex<Option<u16>>,
    fetch_tokens: Mutex<Vec<String>>,
    update_names: Mutex<Vec<String>>,
}

/// Mock plus the same instance as a trait object, for tests that both drive
/// the session and inspect the calls it made.
pub(crate) fn mock_api() -> (Arc<MockBankApi>, Arc<dyn BankApi>) {
    let mock = Arc::new(MockBankApi::new());
    let api: Arc<dyn BankApi> = mock.clone();
    (mock, api)
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockBankApi {
    /// Accepts `alice@argentbank.test` / `password123`, issues `tok123`, and
    /// serves Alice's profile.
    pub(crate) fn new() -> Self {
        Self {
            accepted: ("alice@argentbank.test".into(), "password123".into()),
            issued_token: "tok123".into(),
            current: Mutex::new(profile("Alice")),
            replies: Mutex::new(VecDeque::new()),
            update_failure: Mutex::new(None),
            fetch_tokens: Mutex::new(Vec::new()),
            update_names: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn push_reply(&self, reply: ProfileReply) {
        lock(&self.replies).push_back(reply);
    }

    pub(crate) fn fail_updates_with(&self, status: u16) {
        *lock(&self.update_failure) = Some(status);
    }

    pub(crate) fn fetch_tokens(&self) -> Vec<String> {
        lock(&self.fetch_tokens).clone()
    }

    pub(crate) fn update_names(&self) -> Vec<String> {
        lock(&self.update_names).clone()
    }
}

#[async_trait]
impl BankApi for MockBankApi {
    async fn login(&self, credentials: &Credentials) -> Result<BearerToken, ApiError> {
        let (email, password) = &self.accepted;
        if *email != credentials.email || *password != credentials.password {
            return Err(ApiError::Status { status: 400, message: Some("Error: User not found!".into()) });
        }
        Ok(token(&self.issued_token))
    }

    async fn fetch_profile(&self, token: &BearerToken) -> Result<UserProfile, ApiError> {
        lock(&self.fetch_tokens).push(token.as_str().to_owned());
        let reply = lock(&self.replies).pop_front();
        match reply {
            None => Ok(lock(&self.current).clone()),
            Some(ProfileReply::Status(status)) => Err(ApiError::Status { status, message: None }),
            Some(ProfileReply::Gated(rx)) => match rx.await {
                Ok(Ok(profile)) => Ok(profile),
                Ok(Err(status)) => Err(ApiError::Status { status, message: None }),
                Err(_) => Err(ApiError::Request("gate dropped".into())),
            },
        }
    }

    async fn update_user_name(&self, _token: &BearerToken, user_name: &str) -> Result<UserProfile, ApiError> {
        lock(&self.update_names).push(user_name.to_owned());
        if let Some(status) = *lock(&self.update_failure) {
            return Err(ApiError::Status { status, message: None });
        }
        let mut current = lock(&self.current);
        current.user_name = Some(user_name.to_owned());
        Ok(current.clone())
    }
}
