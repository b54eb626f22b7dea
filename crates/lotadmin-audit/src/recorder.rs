//! Audit recorder — the single swallowing boundary.
//!
//! Every mutating operation in the console reports its outcome here
//! after the mutation has succeeded. A failure to write the audit
//! record must never fail the operation that triggered it, so `record`
//! catches store errors, logs them as operational telemetry, and
//! returns `None` instead of propagating.

use lotadmin_core::repository::AuditLogRepository;
use uuid::Uuid;

use crate::entries::AuditEvent;

pub struct AuditRecorder<R: AuditLogRepository> {
    store: R,
}

impl<R: AuditLogRepository> AuditRecorder<R> {
    pub fn new(store: R) -> Self {
        Self { store }
    }

    /// Durably record an event. Returns the assigned log id, or `None`
    /// if the store rejected the write.
    ///
    /// Callers should await this at the end of their success path —
    /// after the business mutation is known to have succeeded, so an
    /// audit entry never claims success for an action that did not
    /// happen — and must not branch on the result.
    pub async fn record(&self, event: AuditEvent) -> Option<Uuid> {
        let entry = event.into_record();
        let action_type = entry.action_type.clone();
        match self.store.append(entry).await {
            Ok(record) => Some(record.log_id),
            Err(err) => {
                tracing::warn!(
                    action_type = %action_type,
                    error = %err,
                    "audit write failed; record dropped"
                );
                None
            }
        }
    }
}
