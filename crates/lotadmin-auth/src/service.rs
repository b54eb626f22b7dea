//! Authentication service — login, actor resolution, and logout.
//!
//! Generic over repository implementations so the auth layer has no
//! dependency on the database crate. Login outcomes — success and
//! failure alike — are reported to the audit recorder; a failed attempt
//! carries no actor id because no identity was established.

use chrono::{Duration, Utc};
use lotadmin_audit::{AuditEvent, AuditRecorder, RequestMeta};
use lotadmin_core::error::{AdminError, AdminResult};
use lotadmin_core::models::actor::ActorIdentity;
use lotadmin_core::models::session::CreateSession;
use lotadmin_core::repository::{AccountRepository, AuditLogRepository, SessionRepository};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub login_id: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl LoginInput {
    fn meta(&self) -> RequestMeta {
        RequestMeta {
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw opaque session token (return to client, not stored).
    pub session_token: String,
    /// The identity now bound to the session.
    pub actor: ActorIdentity,
    /// Absolute expiry of the session.
    pub expires_at: chrono::DateTime<Utc>,
}

pub struct AuthService<A, S, R>
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

impl<A, S, R> AuthService<A, S, R>
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

    /// Authenticate with login id + password and establish a session.
    ///
    /// Unknown login and wrong password are indistinguishable to the
    /// caller; both produce a null-actor `LOGIN_FAILURE` audit record.
    /// Lockout counting after repeated failures belongs to the rate
    /// limiter in front of this service.
    pub async fn login(&self, input: LoginInput) -> AdminResult<LoginOutput> {
        let account = match self.accounts.get_by_login(&input.login_id).await {
            Ok(a) => a,
            Err(AdminError::NotFound { .. }) => {
                self.record_failure(&input).await;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            &input.password,
            &account.password_hash,
            self.config.pepper.as_deref(),
        )
        .map_err(AdminError::from)?;

        if !valid {
            self.record_failure(&input).await;
            return Err(AuthError::InvalidCredentials.into());
        }

        if !account.is_active {
            self.record_failure(&input).await;
            return Err(AuthError::AccountDisabled.into());
        }

        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.config.session_max_age_secs as i64);

        self.sessions
            .create(CreateSession {
                account_id: account.id,
                token_hash,
                ip_address: input.ip_address.clone(),
                user_agent: input.user_agent.clone(),
                expires_at,
            })
            .await?;

        self.accounts.record_login(account.id).await?;

        let actor = ActorIdentity {
            actor_id: account.id,
            role: account.role,
            display_name: account.full_name.clone(),
        };

        self.recorder
            .record(AuditEvent::login_success(&actor, input.meta()))
            .await;

        Ok(LoginOutput {
            session_token: raw_token,
            actor,
            expires_at,
        })
    }

    /// Resolve the actor identity for a request carrying a raw session
    /// token. Checks absolute expiry, idle timeout, and that the
    /// account is still active; touches the session on success.
    pub async fn resolve_actor(&self, raw_token: &str) -> AdminResult<ActorIdentity> {
        let token_hash = token::hash_session_token(raw_token);
        let session = match self.sessions.get_by_token_hash(&token_hash).await {
            Ok(s) => s,
            Err(AdminError::NotFound { .. }) => return Err(AuthError::SessionInvalid.into()),
            Err(e) => return Err(e),
        };

        let now = Utc::now();
        let idle_cutoff = session.last_seen_at + Duration::seconds(self.config.session_idle_secs as i64);
        if session.expires_at <= now || idle_cutoff <= now {
            // Lapsed either absolutely or through inactivity. The
            // cleanup is best-effort; the caller only needs the denial.
            if let Err(err) = self.sessions.invalidate(session.id).await {
                tracing::warn!(
                    session_id = %session.id,
                    error = %err,
                    "failed to remove lapsed session"
                );
            }
            return Err(AuthError::SessionExpired.into());
        }

        let account = self.accounts.get_by_id(session.account_id).await?;
        if !account.is_active {
            if let Err(err) = self.sessions.invalidate(session.id).await {
                tracing::warn!(
                    session_id = %session.id,
                    error = %err,
                    "failed to remove session of disabled account"
                );
            }
            return Err(AuthError::SessionInvalid.into());
        }

        self.sessions.touch(session.id).await?;

        Ok(ActorIdentity {
            actor_id: account.id,
            role: account.role,
            display_name: account.full_name,
        })
    }

    /// Invalidate the session behind `raw_token` and record the logout.
    pub async fn logout(
        &self,
        actor: &ActorIdentity,
        raw_token: &str,
        meta: RequestMeta,
    ) -> AdminResult<()> {
        let token_hash = token::hash_session_token(raw_token);
        let session = match self.sessions.get_by_token_hash(&token_hash).await {
            Ok(s) => s,
            // Already gone — logout is idempotent.
            Err(AdminError::NotFound { .. }) => return Ok(()),
            Err(e) => return Err(e),
        };

        self.sessions.invalidate(session.id).await?;
        self.recorder.record(AuditEvent::logout(actor, meta)).await;
        Ok(())
    }

    async fn record_failure(&self, input: &LoginInput) {
        self.recorder
            .record(AuditEvent::login_failure(&input.login_id, input.meta()))
            .await;
    }
}
