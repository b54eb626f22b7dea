//! Error types for the lotadmin system.

use thiserror::Error;

use crate::models::role::Role;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("insufficient permissions: requires {required}, actor has {actual}")]
    InsufficientPermission { required: Role, actual: Role },

    #[error("cannot act on own account")]
    SelfActionForbidden,

    #[error("login id already in use: {login_id}")]
    DuplicateLogin { login_id: String },

    #[error("entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("store error: {0}")]
    Store(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// Stable machine-readable code, used in structured failure payloads
    /// for API-style callers.
    pub fn code(&self) -> &'static str {
        match self {
            AdminError::AuthenticationRequired => "AUTH_REQUIRED",
            AdminError::AuthenticationFailed { .. } => "AUTH_FAILED",
            AdminError::InsufficientPermission { .. } => "FORBIDDEN",
            AdminError::SelfActionForbidden => "SELF_ACTION_FORBIDDEN",
            AdminError::DuplicateLogin { .. } => "DUPLICATE_LOGIN",
            AdminError::NotFound { .. } => "NOT_FOUND",
            AdminError::Validation { .. } => "VALIDATION",
            AdminError::Store(_) => "STORE_UNAVAILABLE",
            AdminError::Crypto(_) => "INTERNAL",
            AdminError::Internal(_) => "INTERNAL",
        }
    }
}

pub type AdminResult<T> = Result<T, AdminError>;
