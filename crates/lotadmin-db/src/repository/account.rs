//! SurrealDB implementation of [`AccountRepository`].

use chrono::{DateTime, Utc};
use lotadmin_core::error::AdminResult;
use lotadmin_core::models::account::{AdminAccount, CreateAdminAccount, UpdateAdminAccount};
use lotadmin_core::models::role::Role;
use lotadmin_core::repository::{AccountRepository, Page, PageResult};
use serde::Deserialize;
use surrealdb::sql::Datetime;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, Deserialize)]
struct AccountRow {
    login_id: String,
    password_hash: String,
    full_name: String,
    role: String,
    is_active: bool,
    last_login_at: Option<Datetime>,
    created_at: Datetime,
    updated_at: Datetime,
}

/// DB-side row struct that includes the record ID via `record::id(id)`.
#[derive(Debug, Deserialize)]
struct AccountRowWithId {
    record_id: String,
    login_id: String,
    password_hash: String,
    full_name: String,
    role: String,
    is_active: bool,
    last_login_at: Option<Datetime>,
    created_at: Datetime,
    updated_at: Datetime,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    Role::parse(s).ok_or_else(|| DbError::Decode(format!("unknown role: {s}")))
}

fn to_utc(dt: Datetime) -> DateTime<Utc> {
    dt.0
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Result<AdminAccount, DbError> {
        Ok(AdminAccount {
            id,
            login_id: self.login_id,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role: parse_role(&self.role)?,
            is_active: self.is_active,
            last_login_at: self.last_login_at.map(to_utc),
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<AdminAccount, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(AdminAccount {
            id,
            login_id: self.login_id,
            password_hash: self.password_hash,
            full_name: self.full_name,
            role: parse_role(&self.role)?,
            is_active: self.is_active,
            last_login_at: self.last_login_at.map(to_utc),
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the admin account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAdminAccount) -> AdminResult<AdminAccount> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::thing('admin_account', $id) SET \
                 login_id = $login_id, \
                 password_hash = $password_hash, \
                 full_name = $full_name, \
                 role = $role, \
                 is_active = true, \
                 last_login_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("login_id", input.login_id))
            .bind(("password_hash", input.password_hash))
            .bind(("full_name", input.full_name))
            .bind(("role", input.role.as_str()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AdminResult<AdminAccount> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::thing('admin_account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_login(&self, login_id: &str) -> AdminResult<AdminAccount> {
        let login_owned = login_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * FROM admin_account \
                 WHERE login_id = $login_id",
            )
            .bind(("login_id", login_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_account".into(),
            id: format!("login_id={login_owned}"),
        })?;

        Ok(row.try_into_account()?)
    }

    async fn update(&self, id: Uuid, input: UpdateAdminAccount) -> AdminResult<AdminAccount> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.role.is_some() {
            sets.push("role = $role");
        }
        if input.password_hash.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.is_active.is_some() {
            sets.push("is_active = $is_active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::thing('admin_account', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(role) = input.role {
            builder = builder.bind(("role", role.as_str()));
        }
        if let Some(password_hash) = input.password_hash {
            builder = builder.bind(("password_hash", password_hash));
        }
        if let Some(is_active) = input.is_active {
            builder = builder.bind(("is_active", is_active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "admin_account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn deactivate(&self, id: Uuid) -> AdminResult<()> {
        self.db
            .query(
                "UPDATE type::thing('admin_account', $id) SET \
                 is_active = false, updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AdminResult<()> {
        self.db
            .query("DELETE type::thing('admin_account', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn record_login(&self, id: Uuid) -> AdminResult<()> {
        self.db
            .query(
                "UPDATE type::thing('admin_account', $id) SET \
                 last_login_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, page: Page) -> AdminResult<PageResult<AdminAccount>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM admin_account GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT record::id(id) AS record_id, * FROM admin_account \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", page.size() as u64))
            .bind(("offset", page.offset()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_account())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PageResult {
            items,
            total,
            page: page.number.max(1),
            page_size: page.size(),
        })
    }
}
