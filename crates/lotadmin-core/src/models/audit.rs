//! Audit log domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted audit record.
///
/// Immutable once written: the store exposes no update or delete for
/// individual records, only the bulk retention purge. `actor_id` is a
/// weak reference — records survive deletion of the account, and a
/// `None` actor denotes an unauthenticated or system-initiated action
/// (e.g. a failed login).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Assigned by the store; UUIDv7, so ids are time-ordered.
    pub log_id: Uuid,
    pub actor_id: Option<Uuid>,
    /// Display name captured at write time so history stays readable
    /// after the account is gone.
    pub actor_name: Option<String>,
    pub action_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Assigned by the store.
    pub created_at: DateTime<Utc>,
}

/// Store-facing input for `append`. Snapshots are already serialized;
/// normalization of structured values happens in the recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditRecord {
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub action_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Well-known action type codes. Free-form strings are accepted; these
/// are the ones the console itself writes.
pub mod action {
    pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS";
    pub const LOGIN_FAILURE: &str = "LOGIN_FAILURE";
    pub const LOGOUT: &str = "LOGOUT";
    pub const LOT_UPDATE: &str = "LOT_UPDATE";
    pub const LOT_DELETE: &str = "LOT_DELETE";
    pub const IMAGE_DELETE: &str = "IMAGE_DELETE";
    pub const IMAGE_BULK_DELETE: &str = "IMAGE_BULK_DELETE";
    pub const USER_CREATE: &str = "USER_CREATE";
    pub const USER_UPDATE: &str = "USER_UPDATE";
    pub const USER_DEACTIVATE: &str = "USER_DEACTIVATE";
    pub const USER_DELETE: &str = "USER_DELETE";
    pub const REPORT_EXPORT: &str = "REPORT_EXPORT";
    pub const AUDIT_PURGE: &str = "AUDIT_PURGE";
}

/// Entity category tags used by the console's own records.
pub mod entity {
    pub const LOT: &str = "lot";
    pub const IMAGE: &str = "image";
    pub const ADMIN_ACCOUNT: &str = "admin_account";
    pub const REPORT: &str = "report";
    pub const AUDIT_LOG: &str = "audit_log";
}
