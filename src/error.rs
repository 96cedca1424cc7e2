//! Errors surfaced by the session flows to their immediate caller.

use crate::net::api::ApiError;

/// Message shown on the sign-in form for any login failure.
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Login was rejected or could not be completed. The backend cause is
    /// logged, never shown.
    #[error("Invalid email or password")]
    LoginFailed,

    #[error("Enter both email and password.")]
    MissingCredentials,

    /// The profile fetch task resolved with a failure.
    #[error("{0}")]
    ProfileFetchFailed(String),

    /// `PUT /user/profile` failed; session state is left untouched.
    #[error("failed to update user name: {0}")]
    ProfileUpdateFailed(#[source] ApiError),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("user name must not be empty")]
    EmptyUserName,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
