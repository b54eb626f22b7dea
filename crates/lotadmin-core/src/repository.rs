//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Failures on these paths surface
//! loudly as [`AdminError`]; the one place errors are swallowed is the
//! audit recorder in `lotadmin-audit`, which sits in front of
//! [`AuditLogRepository::append`] on the business write path.
//!
//! [`AdminError`]: crate::error::AdminError

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::AdminResult;
use crate::models::{
    account::{AdminAccount, CreateAdminAccount, UpdateAdminAccount},
    audit::{AuditRecord, NewAuditRecord},
    session::{CreateSession, Session},
};

/// System-wide cap on page size for list queries.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters: 1-indexed page number plus page size.
///
/// Page sizes are clamped to [`MAX_PAGE_SIZE`]; a page number of 0 is
/// treated as 1.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    /// Effective page size after clamping.
    pub fn size(&self) -> u32 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        let number = self.number.max(1) as u64;
        (number - 1) * self.size() as u64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 50,
        }
    }
}

/// A paginated result set. `total` counts the full filtered set,
/// independent of pagination.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

// ---------------------------------------------------------------------------
// Admin accounts
// ---------------------------------------------------------------------------

pub trait AccountRepository: Send + Sync {
    fn create(
        &self,
        input: CreateAdminAccount,
    ) -> impl Future<Output = AdminResult<AdminAccount>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AdminResult<AdminAccount>> + Send;
    /// Lookup by `login_id` — case-sensitive exact match.
    fn get_by_login(&self, login_id: &str)
    -> impl Future<Output = AdminResult<AdminAccount>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateAdminAccount,
    ) -> impl Future<Output = AdminResult<AdminAccount>> + Send;
    /// Soft-disable: clears `is_active`. The row remains.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = AdminResult<()>> + Send;
    /// Hard removal. Audit records referencing the account survive.
    fn delete(&self, id: Uuid) -> impl Future<Output = AdminResult<()>> + Send;
    /// Stamp `last_login_at` with the store clock.
    fn record_login(&self, id: Uuid) -> impl Future<Output = AdminResult<()>> + Send;
    fn list(&self, page: Page) -> impl Future<Output = AdminResult<PageResult<AdminAccount>>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = AdminResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = AdminResult<Session>> + Send;
    /// Refresh `last_seen_at` for idle-timeout tracking.
    fn touch(&self, id: Uuid) -> impl Future<Output = AdminResult<()>> + Send;
    fn invalidate(&self, id: Uuid) -> impl Future<Output = AdminResult<()>> + Send;
    /// Invalidate all sessions for an account (deactivation, password change).
    fn invalidate_for_account(
        &self,
        account_id: Uuid,
    ) -> impl Future<Output = AdminResult<()>> + Send;
    /// Remove all expired sessions; returns the count removed.
    fn cleanup_expired(&self) -> impl Future<Output = AdminResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Audit log (append-only)
// ---------------------------------------------------------------------------

/// Query filters for audit records. Every field is optional; set fields
/// are combined with AND.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub actor_id: Option<Uuid>,
    pub action_type: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive substring match over description and actor name.
    pub search: Option<String>,
}

pub trait AuditLogRepository: Send + Sync {
    /// Append a new record. The store assigns `log_id` and `created_at`;
    /// the record is visible to queries as soon as this returns.
    fn append(&self, input: NewAuditRecord)
    -> impl Future<Output = AdminResult<AuditRecord>> + Send;

    /// Query records, most recent first (the sole supported order).
    fn find(
        &self,
        filter: AuditFilter,
        page: Page,
    ) -> impl Future<Output = AdminResult<PageResult<AuditRecord>>> + Send;

    /// Action types with at least one record, for filter dropdowns.
    fn list_distinct_action_types(&self) -> impl Future<Output = AdminResult<Vec<String>>> + Send;

    /// Entity types with at least one record.
    fn list_distinct_entity_types(&self) -> impl Future<Output = AdminResult<Vec<String>>> + Send;

    /// Irreversibly delete records with `created_at` strictly older than
    /// `now - retention_days`. Records exactly at the boundary are
    /// retained. Returns the count removed. The caller is responsible
    /// for recording the purge itself as a new audit record.
    fn purge_older_than(&self, retention_days: u32)
    -> impl Future<Output = AdminResult<u64>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_one_indexed() {
        assert_eq!(Page::new(1, 20).offset(), 0);
        assert_eq!(Page::new(3, 20).offset(), 40);
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        assert_eq!(Page::new(0, 20).offset(), 0);
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(Page::new(1, 10_000).size(), MAX_PAGE_SIZE);
        assert_eq!(Page::new(1, 0).size(), 1);
        // Offset uses the clamped size.
        assert_eq!(Page::new(2, 10_000).offset(), MAX_PAGE_SIZE as u64);
    }
}
