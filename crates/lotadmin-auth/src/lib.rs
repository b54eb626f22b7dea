//! lotadmin auth — password verification, opaque session tokens,
//! the login/logout service, and admin account management.

pub mod accounts;
pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use accounts::{AccountService, CreateAccountInput, UpdateAccountInput};
pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput};
