//! Admin account management service.
//!
//! Enforces the invariants the authorization gate cannot: an actor may
//! never deactivate, delete, or demote their own account, and login ids
//! are unique. Both checks happen before any mutation, so a rejected
//! call leaves no trace in the store and no audit record.

use lotadmin_audit::{AuditEvent, AuditRecorder, RequestMeta};
use lotadmin_core::error::{AdminError, AdminResult};
use lotadmin_core::models::account::{AdminAccount, CreateAdminAccount, UpdateAdminAccount};
use lotadmin_core::models::actor::ActorIdentity;
use lotadmin_core::models::role::Role;
use lotadmin_core::repository::{
    AccountRepository, AuditLogRepository, Page, PageResult, SessionRepository,
};
use serde_json::json;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::password;

#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    pub login_id: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    pub full_name: Option<String>,
    pub role: Option<Role>,
    /// New raw password; hashed before it reaches the store. All other
    /// sessions for the account are invalidated on change.
    pub password: Option<String>,
}

pub struct AccountService<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: AuditLogRepository,
{
    accounts: A,
    sessions: S,
    recorder: AuditRecorder<R>,
    config: AuthConfig,
}

impl<A, S, R> AccountService<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: AuditLogRepository,
{
    pub fn new(accounts: A, sessions: S, recorder: AuditRecorder<R>, config: AuthConfig) -> Self {
        Self {
            accounts,
            sessions,
            recorder,
            config,
        }
    }

    /// Create a new admin account. `login_id` must be unused
    /// (case-sensitive exact match); self-registration does not exist,
    /// so an acting admin is always required.
    pub async fn create(
        &self,
        actor: &ActorIdentity,
        input: CreateAccountInput,
        meta: RequestMeta,
    ) -> AdminResult<AdminAccount> {
        if input.password.len() < self.config.min_password_length {
            return Err(AdminError::Validation {
                message: format!(
                    "password must be at least {} characters",
                    self.config.min_password_length
                ),
            });
        }

        match self.accounts.get_by_login(&input.login_id).await {
            Ok(_) => {
                return Err(AdminError::DuplicateLogin {
                    login_id: input.login_id,
                });
            }
            Err(AdminError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let password_hash =
            password::hash_password(&input.password, self.config.pepper.as_deref())?;

        let account = self
            .accounts
            .create(CreateAdminAccount {
                login_id: input.login_id,
                password_hash,
                full_name: input.full_name,
                role: input.role,
            })
            .await?;

        self.recorder
            .record(AuditEvent::account_create(
                actor,
                account.id,
                &account.login_id,
                meta,
            ))
            .await;

        Ok(account)
    }

    /// Update name, role, or password. Demoting one's own role is
    /// rejected before any mutation.
    pub async fn update(
        &self,
        actor: &ActorIdentity,
        target_id: Uuid,
        input: UpdateAccountInput,
        meta: RequestMeta,
    ) -> AdminResult<AdminAccount> {
        let before = self.accounts.get_by_id(target_id).await?;

        if actor.actor_id == target_id {
            if let Some(new_role) = input.role {
                if new_role.rank() < before.role.rank() {
                    return Err(AdminError::SelfActionForbidden);
                }
            }
        }

        let password_changed = input.password.is_some();
        let password_hash = match input.password {
            Some(ref raw) => {
                if raw.len() < self.config.min_password_length {
                    return Err(AdminError::Validation {
                        message: format!(
                            "password must be at least {} characters",
                            self.config.min_password_length
                        ),
                    });
                }
                Some(password::hash_password(raw, self.config.pepper.as_deref())?)
            }
            None => None,
        };

        let after = self
            .accounts
            .update(
                target_id,
                UpdateAdminAccount {
                    full_name: input.full_name,
                    role: input.role,
                    password_hash,
                    is_active: None,
                },
            )
            .await?;

        if password_changed {
            self.sessions.invalidate_for_account(target_id).await?;
        }

        self.recorder
            .record(AuditEvent::account_update(
                actor,
                target_id,
                snapshot(&before),
                snapshot(&after),
                meta,
            ))
            .await;

        Ok(after)
    }

    /// Soft-disable an account and kill its sessions. Acting on one's
    /// own account is rejected before any mutation.
    pub async fn deactivate(
        &self,
        actor: &ActorIdentity,
        target_id: Uuid,
        meta: RequestMeta,
    ) -> AdminResult<()> {
        if actor.actor_id == target_id {
            return Err(AdminError::SelfActionForbidden);
        }

        // Surface NotFound before mutating anything.
        self.accounts.get_by_id(target_id).await?;

        self.accounts.deactivate(target_id).await?;
        self.sessions.invalidate_for_account(target_id).await?;

        self.recorder
            .record(AuditEvent::account_deactivate(actor, target_id, meta))
            .await;

        Ok(())
    }

    /// Hard-delete an account. Audit records referencing it survive.
    pub async fn delete(
        &self,
        actor: &ActorIdentity,
        target_id: Uuid,
        meta: RequestMeta,
    ) -> AdminResult<()> {
        if actor.actor_id == target_id {
            return Err(AdminError::SelfActionForbidden);
        }

        self.accounts.get_by_id(target_id).await?;

        self.accounts.delete(target_id).await?;
        self.sessions.invalidate_for_account(target_id).await?;

        self.recorder
            .record(AuditEvent::account_delete(actor, target_id, meta))
            .await;

        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> AdminResult<AdminAccount> {
        self.accounts.get_by_id(id).await
    }

    pub async fn list(&self, page: Page) -> AdminResult<PageResult<AdminAccount>> {
        self.accounts.list(page).await
    }
}

/// Audit snapshot of the fields an update can touch. The password hash
/// never enters the audit trail.
fn snapshot(account: &AdminAccount) -> serde_json::Value {
    json!({
        "full_name": account.full_name,
        "role": account.role.as_str(),
        "is_active": account.is_active,
    })
}
