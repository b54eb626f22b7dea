//! lotadmin core — domain models, role policy, authorization gate,
//! error taxonomy, and repository traits.
//!
//! This crate performs no I/O. Persistence lives in `lotadmin-db`,
//! the audit write path in `lotadmin-audit`, and authentication in
//! `lotadmin-auth`.

pub mod error;
pub mod gate;
pub mod models;
pub mod repository;

pub use error::{AdminError, AdminResult};
