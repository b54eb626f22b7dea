//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! The audit table is append-only: table PERMISSIONS deny update and
//! delete for record clients, and this repository exposes no mutation
//! beyond `append` and the bulk retention purge.

use chrono::{DateTime, Duration, Utc};
use lotadmin_core::error::AdminResult;
use lotadmin_core::models::audit::{AuditRecord, NewAuditRecord};
use lotadmin_core::repository::{AuditFilter, AuditLogRepository, Page, PageResult};
use serde::Deserialize;
use surrealdb::sql::Datetime;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, Deserialize)]
struct AuditRow {
    record_id: String,
    actor_id: Option<String>,
    actor_name: Option<String>,
    action_type: String,
    entity_type: Option<String>,
    entity_id: Option<String>,
    old_value: Option<String>,
    new_value: Option<String>,
    description: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: Datetime,
}

impl AuditRow {
    fn try_into_record(self) -> Result<AuditRecord, DbError> {
        let log_id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        let actor_id = match self.actor_id {
            Some(s) => Some(
                Uuid::parse_str(&s).map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?,
            ),
            None => None,
        };
        Ok(AuditRecord {
            log_id,
            actor_id,
            actor_name: self.actor_name,
            action_type: self.action_type,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            old_value: self.old_value,
            new_value: self.new_value,
            description: self.description,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            created_at: self.created_at.0,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ActionTypeRow {
    action_type: String,
}

#[derive(Debug, Deserialize)]
struct EntityTypeRow {
    entity_type: String,
}

/// Assembles the WHERE clause and bindings shared between the count and
/// page queries of `find`.
struct FilterClause {
    clause: String,
    actor_id: Option<String>,
    action_type: Option<String>,
    entity_type: Option<String>,
    entity_id: Option<String>,
    from: Option<Datetime>,
    to: Option<Datetime>,
    search: Option<String>,
}

impl FilterClause {
    fn build(filter: AuditFilter) -> Self {
        let mut conditions = Vec::new();
        if filter.actor_id.is_some() {
            conditions.push("actor_id = $actor_id");
        }
        if filter.action_type.is_some() {
            conditions.push("action_type = $action_type");
        }
        if filter.entity_type.is_some() {
            conditions.push("entity_type = $entity_type");
        }
        if filter.entity_id.is_some() {
            conditions.push("entity_id = $entity_id");
        }
        if filter.from.is_some() {
            conditions.push("created_at >= $from");
        }
        if filter.to.is_some() {
            conditions.push("created_at <= $to");
        }
        if filter.search.is_some() {
            conditions.push(
                "(string::contains(string::lowercase(description ?? ''), $search) \
                 OR string::contains(string::lowercase(actor_name ?? ''), $search))",
            );
        }

        let clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        Self {
            clause,
            actor_id: filter.actor_id.map(|id| id.to_string()),
            action_type: filter.action_type,
            entity_type: filter.entity_type,
            entity_id: filter.entity_id,
            from: filter.from.map(Datetime::from),
            to: filter.to.map(Datetime::from),
            search: filter.search.map(|s| s.to_lowercase()),
        }
    }

    fn bind<'r, C: Connection>(
        &self,
        mut query: surrealdb::method::Query<'r, C>,
    ) -> surrealdb::method::Query<'r, C> {
        if let Some(ref actor_id) = self.actor_id {
            query = query.bind(("actor_id", actor_id.clone()));
        }
        if let Some(ref action_type) = self.action_type {
            query = query.bind(("action_type", action_type.clone()));
        }
        if let Some(ref entity_type) = self.entity_type {
            query = query.bind(("entity_type", entity_type.clone()));
        }
        if let Some(ref entity_id) = self.entity_id {
            query = query.bind(("entity_id", entity_id.clone()));
        }
        if let Some(ref from) = self.from {
            query = query.bind(("from", from.clone()));
        }
        if let Some(ref to) = self.to {
            query = query.bind(("to", to.clone()));
        }
        if let Some(ref search) = self.search {
            query = query.bind(("search", search.clone()));
        }
        query
    }
}

/// SurrealDB implementation of the audit log store.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: NewAuditRecord) -> AdminResult<AuditRecord> {
        // UUIDv7 record ids keep log ids monotonic across writes.
        let log_id = Uuid::now_v7();
        let id_str = log_id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::thing('audit_log', $id) SET \
                 actor_id = $actor_id, \
                 actor_name = $actor_name, \
                 action_type = $action_type, \
                 entity_type = $entity_type, \
                 entity_id = $entity_id, \
                 old_value = $old_value, \
                 new_value = $new_value, \
                 description = $description, \
                 ip_address = $ip_address, \
                 user_agent = $user_agent",
            )
            .bind(("id", id_str.clone()))
            .bind(("actor_id", input.actor_id.map(|id| id.to_string())))
            .bind(("actor_name", input.actor_name))
            .bind(("action_type", input.action_type))
            .bind(("entity_type", input.entity_type))
            .bind(("entity_id", input.entity_id))
            .bind(("old_value", input.old_value))
            .bind(("new_value", input.new_value))
            .bind(("description", input.description))
            .bind(("ip_address", input.ip_address))
            .bind(("user_agent", input.user_agent))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        // Read the row back through the same path queries use, so what
        // the caller gets is exactly what `find` will return.
        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * \
                 FROM type::thing('audit_log', $id)",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(row.try_into_record()?)
    }

    async fn find(&self, filter: AuditFilter, page: Page) -> AdminResult<PageResult<AuditRecord>> {
        let clause = FilterClause::build(filter);

        let count_sql = format!(
            "SELECT count() AS total FROM audit_log{} GROUP ALL",
            clause.clause
        );
        let count_query = clause.bind(self.db.query(&count_sql));
        let mut count_result = count_query.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let page_sql = format!(
            "SELECT record::id(id) AS record_id, * FROM audit_log{} \
             ORDER BY created_at DESC \
             LIMIT $limit START $offset",
            clause.clause
        );
        let page_query = clause
            .bind(self.db.query(&page_sql))
            .bind(("limit", page.size() as u64))
            .bind(("offset", page.offset()));
        let mut result = page_query.await.map_err(DbError::from)?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_record())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PageResult {
            items,
            total,
            page: page.number.max(1),
            page_size: page.size(),
        })
    }

    async fn list_distinct_action_types(&self) -> AdminResult<Vec<String>> {
        let mut result = self
            .db
            .query(
                "SELECT action_type FROM audit_log \
                 GROUP BY action_type ORDER BY action_type ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ActionTypeRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|r| r.action_type).collect())
    }

    async fn list_distinct_entity_types(&self) -> AdminResult<Vec<String>> {
        let mut result = self
            .db
            .query(
                "SELECT entity_type FROM audit_log \
                 WHERE entity_type != NONE \
                 GROUP BY entity_type ORDER BY entity_type ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityTypeRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.into_iter().map(|r| r.entity_type).collect())
    }

    async fn purge_older_than(&self, retention_days: u32) -> AdminResult<u64> {
        let cutoff: DateTime<Utc> = Utc::now() - Duration::days(retention_days as i64);
        let cutoff = Datetime::from(cutoff);

        // Strictly older than the cutoff; records exactly at the
        // boundary are kept.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM audit_log \
                 WHERE created_at < $cutoff GROUP ALL",
            )
            .bind(("cutoff", cutoff.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE audit_log WHERE created_at < $cutoff")
            .bind(("cutoff", cutoff))
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
