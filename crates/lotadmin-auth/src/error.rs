//! Authentication error types.

use lotadmin_core::error::AdminError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately covers both unknown login and wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("session is invalid")]
    SessionInvalid,

    #[error("session has expired")]
    SessionExpired,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for AdminError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountDisabled
            | AuthError::SessionInvalid
            | AuthError::SessionExpired => AdminError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => AdminError::Crypto(msg),
        }
    }
}
