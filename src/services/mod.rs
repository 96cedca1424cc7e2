//! User-initiated session flows.
//!
//! ARCHITECTURE
//! ============
//! Each flow combines one backend call with the store transitions it
//! implies, so UI handlers stay one-liners: submit login form -> `auth::login`,
//! click logout -> `auth::logout`, save username -> `profile::update_user_name`.

pub mod auth;
pub mod profile;
