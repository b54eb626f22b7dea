//! Session-bound actor identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::role::Role;

/// The authenticated admin behind the current request.
///
/// Established at login, attached to every subsequent request until
/// logout or session expiry. Not persisted beyond the session lifetime;
/// the authoritative record is the [`AdminAccount`] row.
///
/// [`AdminAccount`]: crate::models::account::AdminAccount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorIdentity {
    pub actor_id: Uuid,
    pub role: Role,
    pub display_name: String,
}
