//! Admin account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// An administrator of the console.
///
/// `login_id` is unique and immutable after creation. Accounts are
/// soft-disabled via `is_active` rather than deleted outright; hard
/// deletion exists but audit records referencing the account survive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: Uuid,
    pub login_id: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdminAccount {
    pub login_id: String,
    /// Argon2id PHC-format hash. Hashing happens in the auth layer so
    /// the store never sees a raw password.
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAdminAccount {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}
