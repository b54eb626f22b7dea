//! Domain models for lotadmin.
//!
//! These are the core types shared across all crates.

pub mod account;
pub mod actor;
pub mod audit;
pub mod role;
pub mod session;
