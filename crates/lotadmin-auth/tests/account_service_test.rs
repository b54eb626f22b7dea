//! Integration tests for admin account management, wired to the real
//! SurrealDB repositories over an in-memory engine.

use lotadmin_audit::{AuditRecorder, RequestMeta};
use lotadmin_auth::{
    AccountService, AuthConfig, AuthService, CreateAccountInput, LoginInput, UpdateAccountInput,
};
use lotadmin_core::AdminError;
use lotadmin_core::models::actor::ActorIdentity;
use lotadmin_core::models::audit::action;
use lotadmin_core::models::role::Role;
use lotadmin_core::repository::{AuditFilter, AuditLogRepository, Page};
use lotadmin_db::repository::{
    SurrealAccountRepository, SurrealAuditLogRepository, SurrealSessionRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Accounts = AccountService<
    SurrealAccountRepository<Db>,
    SurrealSessionRepository<Db>,
    SurrealAuditLogRepository<Db>,
>;
type Auth = AuthService<
    SurrealAccountRepository<Db>,
    SurrealSessionRepository<Db>,
    SurrealAuditLogRepository<Db>,
>;

struct Harness {
    accounts: Accounts,
    auth: Auth,
    audit: SurrealAuditLogRepository<Db>,
}

async fn setup() -> Harness {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    lotadmin_db::run_migrations(&db).await.unwrap();

    let account_repo = SurrealAccountRepository::new(db.clone());
    let session_repo = SurrealSessionRepository::new(db.clone());
    let audit = SurrealAuditLogRepository::new(db.clone());

    let accounts = AccountService::new(
        account_repo.clone(),
        session_repo.clone(),
        AuditRecorder::new(audit.clone()),
        AuthConfig::default(),
    );
    let auth = AuthService::new(
        account_repo,
        session_repo,
        AuditRecorder::new(audit.clone()),
        AuthConfig::default(),
    );

    Harness {
        accounts,
        auth,
        audit,
    }
}

const PASSWORD: &str = "correct-horse-battery";

fn admin_actor() -> ActorIdentity {
    ActorIdentity {
        actor_id: Uuid::new_v4(),
        role: Role::Admin,
        display_name: "Root Admin".into(),
    }
}

fn meta() -> RequestMeta {
    RequestMeta::default()
}

fn new_account(login_id: &str, role: Role) -> CreateAccountInput {
    CreateAccountInput {
        login_id: login_id.into(),
        password: PASSWORD.into(),
        full_name: format!("Operator {login_id}"),
        role,
    }
}

async fn audit_records(
    harness: &Harness,
    action_type: &str,
) -> Vec<lotadmin_core::models::audit::AuditRecord> {
    harness
        .audit
        .find(
            AuditFilter {
                action_type: Some(action_type.into()),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap()
        .items
}

#[tokio::test]
async fn created_account_can_login() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Manager), meta())
        .await
        .unwrap();
    assert_eq!(account.role, Role::Manager);
    assert!(account.is_active);

    let output = harness
        .auth
        .login(LoginInput {
            login_id: "alice".into(),
            password: PASSWORD.into(),
            ip_address: None,
            user_agent: None,
        })
        .await
        .unwrap();
    assert_eq!(output.actor.actor_id, account.id);

    let records = audit_records(&harness, action::USER_CREATE).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor_id, Some(actor.actor_id));
    assert_eq!(records[0].entity_id.as_deref(), Some(account.id.to_string().as_str()));
}

#[tokio::test]
async fn short_password_is_rejected_up_front() {
    let harness = setup().await;

    let mut input = new_account("alice", Role::Viewer);
    input.password = "short".into();

    let err = harness
        .accounts
        .create(&admin_actor(), input, meta())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Validation { .. }));
    assert!(audit_records(&harness, action::USER_CREATE).await.is_empty());
}

#[tokio::test]
async fn duplicate_login_leaves_no_trace() {
    let harness = setup().await;
    let actor = admin_actor();

    harness
        .accounts
        .create(&actor, new_account("alice", Role::Viewer), meta())
        .await
        .unwrap();

    let err = harness
        .accounts
        .create(&actor, new_account("alice", Role::Admin), meta())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::DuplicateLogin { .. }));

    // Only the first create was recorded.
    assert_eq!(audit_records(&harness, action::USER_CREATE).await.len(), 1);
}

#[tokio::test]
async fn update_records_before_and_after_without_password_hash() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Viewer), meta())
        .await
        .unwrap();

    let updated = harness
        .accounts
        .update(
            &actor,
            account.id,
            UpdateAccountInput {
                role: Some(Role::Manager),
                ..Default::default()
            },
            meta(),
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Manager);

    let records = audit_records(&harness, action::USER_UPDATE).await;
    assert_eq!(records.len(), 1);
    let old_value = records[0].old_value.as_deref().unwrap();
    let new_value = records[0].new_value.as_deref().unwrap();
    assert!(old_value.contains("Viewer"));
    assert!(new_value.contains("Manager"));
    assert!(!old_value.contains("argon2"));
    assert!(!new_value.contains("argon2"));
}

#[tokio::test]
async fn password_change_invalidates_existing_sessions() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Viewer), meta())
        .await
        .unwrap();

    let output = harness
        .auth
        .login(LoginInput {
            login_id: "alice".into(),
            password: PASSWORD.into(),
            ip_address: None,
            user_agent: None,
        })
        .await
        .unwrap();
    assert!(harness.auth.resolve_actor(&output.session_token).await.is_ok());

    harness
        .accounts
        .update(
            &actor,
            account.id,
            UpdateAccountInput {
                password: Some("an-entirely-new-password".into()),
                ..Default::default()
            },
            meta(),
        )
        .await
        .unwrap();

    let err = harness
        .auth
        .resolve_actor(&output.session_token)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn self_demotion_is_forbidden_before_mutation() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Admin), meta())
        .await
        .unwrap();
    let alice = ActorIdentity {
        actor_id: account.id,
        role: account.role,
        display_name: account.full_name.clone(),
    };

    let err = harness
        .accounts
        .update(
            &alice,
            account.id,
            UpdateAccountInput {
                role: Some(Role::Viewer),
                ..Default::default()
            },
            meta(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::SelfActionForbidden));

    let fetched = harness.accounts.get(account.id).await.unwrap();
    assert_eq!(fetched.role, Role::Admin);
    assert!(audit_records(&harness, action::USER_UPDATE).await.is_empty());
}

#[tokio::test]
async fn self_deactivation_is_forbidden_before_mutation() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Admin), meta())
        .await
        .unwrap();
    let alice = ActorIdentity {
        actor_id: account.id,
        role: account.role,
        display_name: account.full_name.clone(),
    };

    let err = harness
        .accounts
        .deactivate(&alice, account.id, meta())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::SelfActionForbidden));

    let fetched = harness.accounts.get(account.id).await.unwrap();
    assert!(fetched.is_active, "account must remain active");
    assert!(audit_records(&harness, action::USER_DEACTIVATE).await.is_empty());
}

#[tokio::test]
async fn self_deletion_is_forbidden() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Admin), meta())
        .await
        .unwrap();
    let alice = ActorIdentity {
        actor_id: account.id,
        role: account.role,
        display_name: account.full_name.clone(),
    };

    let err = harness
        .accounts
        .delete(&alice, account.id, meta())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::SelfActionForbidden));
    assert!(harness.accounts.get(account.id).await.is_ok());
}

#[tokio::test]
async fn deactivation_of_another_account_is_recorded() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Viewer), meta())
        .await
        .unwrap();

    harness
        .accounts
        .deactivate(&actor, account.id, meta())
        .await
        .unwrap();

    let fetched = harness.accounts.get(account.id).await.unwrap();
    assert!(!fetched.is_active);

    let records = audit_records(&harness, action::USER_DEACTIVATE).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor_id, Some(actor.actor_id));
}

#[tokio::test]
async fn deleting_a_missing_account_is_not_found() {
    let harness = setup().await;

    let err = harness
        .accounts
        .delete(&admin_actor(), Uuid::new_v4(), meta())
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::NotFound { .. }));
    assert!(audit_records(&harness, action::USER_DELETE).await.is_empty());
}

#[tokio::test]
async fn audit_history_survives_account_deletion() {
    let harness = setup().await;
    let actor = admin_actor();

    let account = harness
        .accounts
        .create(&actor, new_account("alice", Role::Manager), meta())
        .await
        .unwrap();

    // Alice leaves a trail, then her account is removed.
    harness
        .auth
        .login(LoginInput {
            login_id: "alice".into(),
            password: PASSWORD.into(),
            ip_address: None,
            user_agent: None,
        })
        .await
        .unwrap();

    harness
        .accounts
        .delete(&actor, account.id, meta())
        .await
        .unwrap();
    assert!(harness.accounts.get(account.id).await.is_err());

    let trail = harness
        .audit
        .find(
            AuditFilter {
                actor_id: Some(account.id),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(trail.total, 1, "her login record must survive");
    assert_eq!(trail.items[0].action_type, action::LOGIN_SUCCESS);
    assert_eq!(
        trail.items[0].actor_name.as_deref(),
        Some("Operator alice"),
        "display name stays readable after deletion"
    );
}
