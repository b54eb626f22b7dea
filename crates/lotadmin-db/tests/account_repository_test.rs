//! Integration tests for the admin account repository using in-memory
//! SurrealDB.

use lotadmin_core::AdminError;
use lotadmin_core::models::account::{CreateAdminAccount, UpdateAdminAccount};
use lotadmin_core::models::role::Role;
use lotadmin_core::repository::{AccountRepository, Page};
use lotadmin_db::repository::SurrealAccountRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    lotadmin_db::run_migrations(&db).await.unwrap();
    db
}

fn new_account(login_id: &str, role: Role) -> CreateAdminAccount {
    CreateAdminAccount {
        login_id: login_id.into(),
        password_hash: "$argon2id$fake".into(),
        full_name: format!("Account {login_id}"),
        role,
    }
}

#[tokio::test]
async fn create_and_get_account() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let created = repo.create(new_account("alice", Role::Admin)).await.unwrap();
    assert_eq!(created.login_id, "alice");
    assert_eq!(created.role, Role::Admin);
    assert!(created.is_active);
    assert!(created.last_login_at.is_none());

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.login_id, "alice");
}

#[tokio::test]
async fn get_by_login_is_case_sensitive() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    repo.create(new_account("alice", Role::Viewer)).await.unwrap();

    let found = repo.get_by_login("alice").await.unwrap();
    assert_eq!(found.login_id, "alice");

    let miss = repo.get_by_login("Alice").await;
    assert!(
        matches!(miss, Err(AdminError::NotFound { .. })),
        "lookup must be an exact match"
    );
}

#[tokio::test]
async fn duplicate_login_is_rejected_by_unique_index() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    repo.create(new_account("bob", Role::Manager)).await.unwrap();
    let result = repo.create(new_account("bob", Role::Viewer)).await;
    assert!(result.is_err(), "second create with same login must fail");
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let created = repo.create(new_account("carol", Role::Viewer)).await.unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateAdminAccount {
                role: Some(Role::Manager),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, Role::Manager);
    assert_eq!(updated.full_name, created.full_name);
    assert_eq!(updated.password_hash, created.password_hash);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn deactivate_keeps_the_row() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let created = repo.create(new_account("dan", Role::Manager)).await.unwrap();
    repo.deactivate(created.id).await.unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert!(!fetched.is_active);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let created = repo.create(new_account("erin", Role::Admin)).await.unwrap();
    repo.delete(created.id).await.unwrap();

    let miss = repo.get_by_id(created.id).await;
    assert!(matches!(miss, Err(AdminError::NotFound { .. })));
}

#[tokio::test]
async fn record_login_stamps_last_login() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    let created = repo.create(new_account("fred", Role::Viewer)).await.unwrap();
    assert!(created.last_login_at.is_none());

    repo.record_login(created.id).await.unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert!(fetched.last_login_at.is_some());
}

#[tokio::test]
async fn list_paginates_with_full_total() {
    let db = setup().await;
    let repo = SurrealAccountRepository::new(db);

    for login in ["u1", "u2", "u3"] {
        repo.create(new_account(login, Role::Viewer)).await.unwrap();
    }

    let page = repo.list(Page::new(1, 2)).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 2);

    let last = repo.list(Page::new(2, 2)).await.unwrap();
    assert_eq!(last.total, 3);
    assert_eq!(last.items.len(), 1);
}
