use super::*;
use crate::test_helpers::{profile, token};

fn assert_auth_implies_token(state: &SessionState) {
    if state.is_authenticated {
        assert!(state.token.is_some(), "authenticated session must hold a token");
    }
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn new_store_is_empty_idle_and_unauthenticated() {
    let store = SessionStore::default();
    let state = store.snapshot();
    assert_eq!(state, SessionState::default());
    assert!(state.token.is_none());
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
    assert_eq!(state.status, FetchStatus::Idle);
    assert!(state.error.is_none());
}

#[test]
fn fetch_status_names_match_lifecycle() {
    assert_eq!(FetchStatus::Idle.as_str(), "idle");
    assert_eq!(FetchStatus::Loading.as_str(), "loading");
    assert_eq!(FetchStatus::Succeeded.as_str(), "succeeded");
    assert_eq!(FetchStatus::Failed.as_str(), "failed");
}

// =============================================================
// set_token
// =============================================================

#[test]
fn set_token_stores_token_and_authenticates() {
    let store = SessionStore::default();
    store.set_token(token("tok123"));
    let state = store.snapshot();
    assert_eq!(state.token, Some(token("tok123")));
    assert!(state.is_authenticated);
    assert!(store.is_authenticated());
}

#[test]
fn set_token_leaves_user_untouched() {
    let store = SessionStore::default();
    store.set_token(token("first"));
    let ticket = store.begin_fetch();
    assert!(store.resolve_fetch(&ticket, Ok(profile("Alice"))));

    store.set_token(token("second"));
    let state = store.snapshot();
    assert_eq!(state.token, Some(token("second")));
    assert_eq!(state.user, Some(profile("Alice")));
}

#[test]
fn clones_share_state() {
    let store = SessionStore::default();
    let other = store.clone();
    other.set_token(token("tok"));
    assert!(store.is_authenticated());
}

// =============================================================
// logout
// =============================================================

#[test]
fn logout_clears_token_user_and_flag() {
    let store = SessionStore::default();
    store.set_token(token("tok123"));
    let ticket = store.begin_fetch();
    store.resolve_fetch(&ticket, Ok(profile("Alice")));

    store.logout();
    let state = store.snapshot();
    assert!(state.token.is_none());
    assert!(state.user.is_none());
    assert!(!state.is_authenticated);
}

#[test]
fn logout_is_idempotent() {
    let store = SessionStore::default();
    store.logout();
    let once = store.snapshot();
    store.logout();
    assert_eq!(store.snapshot(), once);
    assert!(!once.is_authenticated);
}

#[test]
fn logout_after_failed_fetch_clears_retained_token() {
    let store = SessionStore::default();
    store.set_token(token("tok123"));
    let ticket = store.begin_fetch();
    store.resolve_fetch(&ticket, Err("Failed to fetch user profile".into()));
    assert!(store.snapshot().token.is_some());

    store.logout();
    assert!(store.snapshot().token.is_none());
}

#[test]
fn keep_policy_logout_leaves_fetch_status() {
    let store = SessionStore::new(LogoutPolicy::KeepInFlight);
    store.set_token(token("tok"));
    let ticket = store.begin_fetch();
    store.logout();
    assert_eq!(store.snapshot().status, FetchStatus::Loading);
    assert!(!ticket.cancel.is_cancelled());
}

#[test]
fn cancel_policy_logout_cancels_in_flight_and_idles() {
    let store = SessionStore::new(LogoutPolicy::CancelInFlight);
    store.set_token(token("tok"));
    let ticket = store.begin_fetch();
    store.logout();

    assert!(ticket.cancel.is_cancelled());
    assert_eq!(store.snapshot().status, FetchStatus::Idle);
    assert!(!store.resolve_fetch(&ticket, Ok(profile("Alice"))));
    assert!(store.snapshot().user.is_none());
}

#[test]
fn cancel_policy_logout_spares_later_dispatches() {
    let store = SessionStore::new(LogoutPolicy::CancelInFlight);
    store.logout();
    store.set_token(token("tok"));
    let ticket = store.begin_fetch();
    assert!(!ticket.cancel.is_cancelled());
    assert!(store.resolve_fetch(&ticket, Ok(profile("Alice"))));
}

// =============================================================
// fetch transitions
// =============================================================

#[test]
fn begin_fetch_marks_loading_clears_error_and_captures_token() {
    let store = SessionStore::default();
    store.set_token(token("tok123"));
    let failed = store.begin_fetch();
    store.resolve_fetch(&failed, Err("boom".into()));
    assert_eq!(store.snapshot().error.as_deref(), Some("boom"));

    let ticket = store.begin_fetch();
    let state = store.snapshot();
    assert_eq!(state.status, FetchStatus::Loading);
    assert!(state.error.is_none());
    assert_eq!(ticket.token, Some(token("tok123")));
    assert_eq!(ticket.id, failed.id + 1);
}

#[test]
fn resolve_success_sets_user_without_touching_auth() {
    let store = SessionStore::default();
    store.set_token(token("tok123"));
    let ticket = store.begin_fetch();
    assert!(store.resolve_fetch(&ticket, Ok(profile("Alice"))));

    let state = store.snapshot();
    assert_eq!(state.status, FetchStatus::Succeeded);
    assert_eq!(state.user.and_then(|u| u.user_name).as_deref(), Some("Alice"));
    assert!(state.is_authenticated);
    assert_eq!(state.token, Some(token("tok123")));
}

#[test]
fn resolve_failure_deauthenticates_but_keeps_token() {
    let store = SessionStore::default();
    store.set_token(token("tok123"));
    let ticket = store.begin_fetch();
    store.resolve_fetch(&ticket, Err("Failed to fetch user profile".into()));

    let state = store.snapshot();
    assert_eq!(state.status, FetchStatus::Failed);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch user profile"));
    assert!(!state.is_authenticated);
    assert!(state.token.is_some());
    assert_auth_implies_token(&state);
}

#[test]
fn abandon_only_idles_the_latest_dispatch() {
    let store = SessionStore::default();
    store.set_token(token("tok"));
    let older = store.begin_fetch();
    let newer = store.begin_fetch();

    store.abandon_fetch(&older);
    assert_eq!(store.snapshot().status, FetchStatus::Loading);

    store.abandon_fetch(&newer);
    assert_eq!(store.snapshot().status, FetchStatus::Idle);
}

#[test]
fn invariant_holds_across_transition_sequence() {
    let store = SessionStore::default();
    assert_auth_implies_token(&store.snapshot());
    store.set_token(token("a"));
    assert_auth_implies_token(&store.snapshot());
    let ticket = store.begin_fetch();
    store.resolve_fetch(&ticket, Err("x".into()));
    assert_auth_implies_token(&store.snapshot());
    store.logout();
    assert_auth_implies_token(&store.snapshot());
    let ticket = store.begin_fetch();
    store.resolve_fetch(&ticket, Ok(profile("Alice")));
    assert_auth_implies_token(&store.snapshot());
}

// =============================================================
// subscribe
// =============================================================

#[tokio::test]
async fn subscribers_see_each_change() {
    let store = SessionStore::default();
    let mut rx = store.subscribe();

    store.set_token(token("tok"));
    rx.changed().await.unwrap();
    assert!(rx.borrow_and_update().is_authenticated);

    store.logout();
    rx.changed().await.unwrap();
    assert!(!rx.borrow_and_update().is_authenticated);
}

#[test]
fn debug_output_redacts_token() {
    let store = SessionStore::default();
    store.set_token(token("very-secret-token"));
    let debug = format!("{store:?}");
    assert!(!debug.contains("very-secret-token"));
    assert!(debug.contains("is_authenticated: true"));
}
