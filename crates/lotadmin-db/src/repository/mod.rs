//! SurrealDB repository implementations for the `lotadmin-core` traits.

mod account;
mod audit;
mod session;

pub use account::SurrealAccountRepository;
pub use audit::SurrealAuditLogRepository;
pub use session::SurrealSessionRepository;
