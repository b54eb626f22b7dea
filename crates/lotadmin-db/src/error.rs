//! Database-specific error types and conversions.

use lotadmin_core::error::AdminError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("corrupt row: {0}")]
    Decode(String),

    #[error("record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for AdminError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => AdminError::NotFound { entity, id },
            other => AdminError::Store(other.to_string()),
        }
    }
}
