//! lotadmin audit — the write side of the audit trail.
//!
//! Business operations report their outcome through [`AuditRecorder`],
//! which can never fail the operation that called it. Read-path queries
//! go straight to the [`AuditLogRepository`] trait and fail loudly;
//! the retention purge lives in [`AuditMaintenance`] so the purge
//! itself gets recorded.
//!
//! [`AuditLogRepository`]: lotadmin_core::repository::AuditLogRepository

pub mod entries;
pub mod maintenance;
pub mod recorder;

pub use entries::{AuditEvent, RequestMeta};
pub use maintenance::AuditMaintenance;
pub use recorder::AuditRecorder;
