//! Retention-based purge with self-recording.

use lotadmin_core::error::AdminResult;
use lotadmin_core::models::actor::ActorIdentity;
use lotadmin_core::repository::AuditLogRepository;

use crate::entries::{AuditEvent, RequestMeta};
use crate::recorder::AuditRecorder;

/// Administrative maintenance over the audit log.
///
/// The only sanctioned deletion of audit history is the retention
/// purge, and the purge itself must leave a record behind — so this
/// wrapper pairs the store's `purge_older_than` with a recorder write.
pub struct AuditMaintenance<R: AuditLogRepository + Clone> {
    store: R,
    recorder: AuditRecorder<R>,
}

impl<R: AuditLogRepository + Clone> AuditMaintenance<R> {
    pub fn new(store: R) -> Self {
        Self {
            recorder: AuditRecorder::new(store.clone()),
            store,
        }
    }

    /// Delete records strictly older than `now - retention_days` and
    /// record the purge. The purge failure propagates (read-path rules:
    /// administrative calls fail loudly); a failure to record the purge
    /// does not.
    pub async fn purge_older_than(
        &self,
        actor: &ActorIdentity,
        retention_days: u32,
        meta: RequestMeta,
    ) -> AdminResult<u64> {
        let removed = self.store.purge_older_than(retention_days).await?;
        self.recorder
            .record(AuditEvent::audit_purge(actor, retention_days, removed, meta))
            .await;
        Ok(removed)
    }
}
