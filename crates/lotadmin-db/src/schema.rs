//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, Deserialize)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Admin accounts
-- =======================================================================
DEFINE TABLE admin_account SCHEMAFULL;
DEFINE FIELD login_id ON TABLE admin_account TYPE string;
DEFINE FIELD password_hash ON TABLE admin_account TYPE string;
DEFINE FIELD full_name ON TABLE admin_account TYPE string;
DEFINE FIELD role ON TABLE admin_account TYPE string \
    ASSERT $value IN ['Viewer', 'Manager', 'Admin'];
DEFINE FIELD is_active ON TABLE admin_account TYPE bool DEFAULT true;
DEFINE FIELD last_login_at ON TABLE admin_account \
    TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE admin_account TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE admin_account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_login ON TABLE admin_account \
    COLUMNS login_id UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD account_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD ip_address ON TABLE session TYPE option<string>;
DEFINE FIELD user_agent ON TABLE session TYPE option<string>;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD last_seen_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_account ON TABLE session \
    COLUMNS account_id;

-- =======================================================================
-- Audit log (append-only)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD actor_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD actor_name ON TABLE audit_log TYPE option<string>;
DEFINE FIELD action_type ON TABLE audit_log TYPE string;
DEFINE FIELD entity_type ON TABLE audit_log TYPE option<string>;
DEFINE FIELD entity_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD old_value ON TABLE audit_log TYPE option<string>;
DEFINE FIELD new_value ON TABLE audit_log TYPE option<string>;
DEFINE FIELD description ON TABLE audit_log TYPE option<string>;
DEFINE FIELD ip_address ON TABLE audit_log TYPE option<string>;
DEFINE FIELD user_agent ON TABLE audit_log TYPE option<string>;
DEFINE FIELD created_at ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_created ON TABLE audit_log \
    COLUMNS created_at;
DEFINE INDEX idx_audit_actor ON TABLE audit_log \
    COLUMNS actor_id;
DEFINE INDEX idx_audit_action ON TABLE audit_log \
    COLUMNS action_type;
DEFINE INDEX idx_audit_entity ON TABLE audit_log \
    COLUMNS entity_type;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(version = migration.version, "migration applied");
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn audit_log_defines_no_update_or_delete() {
        assert!(SCHEMA_V1.contains("FOR update NONE"));
        assert!(SCHEMA_V1.contains("FOR delete NONE"));
    }
}
