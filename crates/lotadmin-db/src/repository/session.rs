//! SurrealDB implementation of [`SessionRepository`].

use chrono::{DateTime, Utc};
use lotadmin_core::error::AdminResult;
use lotadmin_core::models::session::{CreateSession, Session};
use lotadmin_core::repository::SessionRepository;
use serde::Deserialize;
use surrealdb::sql::Datetime;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, Deserialize)]
struct SessionRow {
    account_id: String,
    token_hash: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    expires_at: Datetime,
    last_seen_at: Datetime,
    created_at: Datetime,
}

#[derive(Debug, Deserialize)]
struct SessionRowWithId {
    record_id: String,
    account_id: String,
    token_hash: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    expires_at: Datetime,
    last_seen_at: Datetime,
    created_at: Datetime,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

fn parse_uuid(s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))
}

fn to_utc(dt: Datetime) -> DateTime<Utc> {
    dt.0
}

impl SessionRow {
    fn into_session(self, id: Uuid) -> Result<Session, DbError> {
        Ok(Session {
            id,
            account_id: parse_uuid(&self.account_id)?,
            token_hash: self.token_hash,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            expires_at: to_utc(self.expires_at),
            last_seen_at: to_utc(self.last_seen_at),
            created_at: to_utc(self.created_at),
        })
    }
}

impl SessionRowWithId {
    fn try_into_session(self) -> Result<Session, DbError> {
        let id = parse_uuid(&self.record_id)?;
        Ok(Session {
            id,
            account_id: parse_uuid(&self.account_id)?,
            token_hash: self.token_hash,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            expires_at: to_utc(self.expires_at),
            last_seen_at: to_utc(self.last_seen_at),
            created_at: to_utc(self.created_at),
        })
    }
}

/// SurrealDB implementation of the session repository.
#[derive(Clone)]
pub struct SurrealSessionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSessionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SessionRepository for SurrealSessionRepository<C> {
    async fn create(&self, input: CreateSession) -> AdminResult<Session> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::thing('session', $id) SET \
                 account_id = $account_id, \
                 token_hash = $token_hash, \
                 ip_address = $ip_address, \
                 user_agent = $user_agent, \
                 expires_at = $expires_at",
            )
            .bind(("id", id_str.clone()))
            .bind(("account_id", input.account_id.to_string()))
            .bind(("token_hash", input.token_hash))
            .bind(("ip_address", input.ip_address))
            .bind(("user_agent", input.user_agent))
            .bind(("expires_at", Datetime::from(input.expires_at)))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<SessionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: id_str,
        })?;

        Ok(row.into_session(id)?)
    }

    async fn get_by_token_hash(&self, token_hash: &str) -> AdminResult<Session> {
        let hash_owned = token_hash.to_string();

        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * FROM session \
                 WHERE token_hash = $token_hash",
            )
            .bind(("token_hash", hash_owned))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SessionRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "session".into(),
            id: "token".into(),
        })?;

        Ok(row.try_into_session()?)
    }

    async fn touch(&self, id: Uuid) -> AdminResult<()> {
        self.db
            .query(
                "UPDATE type::thing('session', $id) SET \
                 last_seen_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn invalidate(&self, id: Uuid) -> AdminResult<()> {
        self.db
            .query("DELETE type::thing('session', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn invalidate_for_account(&self, account_id: Uuid) -> AdminResult<()> {
        self.db
            .query("DELETE session WHERE account_id = $account_id")
            .bind(("account_id", account_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> AdminResult<u64> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM session \
                 WHERE expires_at < time::now() GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE session WHERE expires_at < time::now()")
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
