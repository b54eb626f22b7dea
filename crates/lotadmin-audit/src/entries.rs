//! Audit event shapes and named entry factories.
//!
//! Every factory is a thin constructor over the one generic
//! [`AuditEvent`] shape — a conventional action type string plus a
//! description template. There is no separate mechanism per action.

use lotadmin_core::models::actor::ActorIdentity;
use lotadmin_core::models::audit::{NewAuditRecord, action, entity};
use serde_json::Value;
use uuid::Uuid;

/// Request-scoped metadata carried into every record.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A not-yet-normalized audit entry.
///
/// `actor` is `None` for pre-authentication events such as failed
/// logins. Old/new snapshots may be structured JSON; the recorder
/// serializes them before handing the entry to the store.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub actor_id: Option<Uuid>,
    pub actor_name: Option<String>,
    pub action_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub description: Option<String>,
    pub meta: RequestMeta,
}

/// Serialize a snapshot unless it already is a plain string.
fn normalize(value: Option<Value>) -> Option<String> {
    value.map(|v| match v {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

impl AuditEvent {
    /// Generic constructor; the named factories below cover the
    /// console's own actions.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            actor_id: None,
            actor_name: None,
            action_type: action_type.into(),
            entity_type: None,
            entity_id: None,
            old_value: None,
            new_value: None,
            description: None,
            meta: RequestMeta::default(),
        }
    }

    pub fn by(mut self, actor: &ActorIdentity) -> Self {
        self.actor_id = Some(actor.actor_id);
        self.actor_name = Some(actor.display_name.clone());
        self
    }

    pub fn on(mut self, entity_type: &str, entity_id: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn describing(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_meta(mut self, meta: RequestMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn old(mut self, value: Value) -> Self {
        self.old_value = Some(value);
        self
    }

    pub fn new_value(mut self, value: Value) -> Self {
        self.new_value = Some(value);
        self
    }

    /// Flatten into the store-facing shape, serializing structured
    /// snapshots. `created_at` is deliberately absent — the store
    /// assigns it.
    pub fn into_record(self) -> NewAuditRecord {
        NewAuditRecord {
            actor_id: self.actor_id,
            actor_name: self.actor_name,
            action_type: self.action_type,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            old_value: normalize(self.old_value),
            new_value: normalize(self.new_value),
            description: self.description,
            ip_address: self.meta.ip_address,
            user_agent: self.meta.user_agent,
        }
    }

    // -- named factories ----------------------------------------------------

    pub fn login_success(actor: &ActorIdentity, meta: RequestMeta) -> Self {
        Self::new(action::LOGIN_SUCCESS)
            .by(actor)
            .describing(format!("{} signed in", actor.display_name))
            .with_meta(meta)
    }

    /// Failed login — no actor identity exists yet, so `actor_id` stays
    /// null and only the attempted login id is recorded.
    pub fn login_failure(attempted_login: &str, meta: RequestMeta) -> Self {
        Self::new(action::LOGIN_FAILURE)
            .describing(format!("failed login attempt for '{attempted_login}'"))
            .with_meta(meta)
    }

    pub fn logout(actor: &ActorIdentity, meta: RequestMeta) -> Self {
        Self::new(action::LOGOUT)
            .by(actor)
            .describing(format!("{} signed out", actor.display_name))
            .with_meta(meta)
    }

    pub fn lot_update(
        actor: &ActorIdentity,
        lot_id: &str,
        old: Value,
        new: Value,
        meta: RequestMeta,
    ) -> Self {
        Self::new(action::LOT_UPDATE)
            .by(actor)
            .on(entity::LOT, lot_id)
            .old(old)
            .new_value(new)
            .describing(format!("updated lot {lot_id}"))
            .with_meta(meta)
    }

    pub fn lot_delete(actor: &ActorIdentity, lot_id: &str, old: Value, meta: RequestMeta) -> Self {
        Self::new(action::LOT_DELETE)
            .by(actor)
            .on(entity::LOT, lot_id)
            .old(old)
            .describing(format!("deleted lot {lot_id}"))
            .with_meta(meta)
    }

    pub fn image_delete(
        actor: &ActorIdentity,
        image_id: &str,
        lot_id: &str,
        meta: RequestMeta,
    ) -> Self {
        Self::new(action::IMAGE_DELETE)
            .by(actor)
            .on(entity::IMAGE, image_id)
            .describing(format!("deleted image {image_id} from lot {lot_id}"))
            .with_meta(meta)
    }

    pub fn images_bulk_delete(
        actor: &ActorIdentity,
        lot_id: &str,
        count: usize,
        meta: RequestMeta,
    ) -> Self {
        Self::new(action::IMAGE_BULK_DELETE)
            .by(actor)
            .on(entity::LOT, lot_id)
            .describing(format!("deleted {count} images from lot {lot_id}"))
            .with_meta(meta)
    }

    pub fn account_create(
        actor: &ActorIdentity,
        target_id: Uuid,
        target_login: &str,
        meta: RequestMeta,
    ) -> Self {
        Self::new(action::USER_CREATE)
            .by(actor)
            .on(entity::ADMIN_ACCOUNT, target_id.to_string())
            .describing(format!("created account '{target_login}'"))
            .with_meta(meta)
    }

    pub fn account_update(
        actor: &ActorIdentity,
        target_id: Uuid,
        old: Value,
        new: Value,
        meta: RequestMeta,
    ) -> Self {
        Self::new(action::USER_UPDATE)
            .by(actor)
            .on(entity::ADMIN_ACCOUNT, target_id.to_string())
            .old(old)
            .new_value(new)
            .describing(format!("updated account {target_id}"))
            .with_meta(meta)
    }

    pub fn account_deactivate(actor: &ActorIdentity, target_id: Uuid, meta: RequestMeta) -> Self {
        Self::new(action::USER_DEACTIVATE)
            .by(actor)
            .on(entity::ADMIN_ACCOUNT, target_id.to_string())
            .describing(format!("deactivated account {target_id}"))
            .with_meta(meta)
    }

    pub fn account_delete(actor: &ActorIdentity, target_id: Uuid, meta: RequestMeta) -> Self {
        Self::new(action::USER_DELETE)
            .by(actor)
            .on(entity::ADMIN_ACCOUNT, target_id.to_string())
            .describing(format!("deleted account {target_id}"))
            .with_meta(meta)
    }

    pub fn report_export(actor: &ActorIdentity, report_name: &str, meta: RequestMeta) -> Self {
        Self::new(action::REPORT_EXPORT)
            .by(actor)
            .on(entity::REPORT, report_name)
            .describing(format!("exported report '{report_name}'"))
            .with_meta(meta)
    }

    /// The purge of history is itself a historical event.
    pub fn audit_purge(
        actor: &ActorIdentity,
        retention_days: u32,
        removed: u64,
        meta: RequestMeta,
    ) -> Self {
        Self::new(action::AUDIT_PURGE)
            .by(actor)
            .on(entity::AUDIT_LOG, format!("retention={retention_days}d"))
            .describing(format!(
                "purged {removed} audit records older than {retention_days} days"
            ))
            .with_meta(meta)
    }
}
