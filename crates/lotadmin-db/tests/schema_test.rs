//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    lotadmin_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: surrealdb::Value = result.take(0).unwrap();
    let info_str = format!("{:?}", info);

    assert!(
        info_str.contains("admin_account"),
        "missing admin_account table"
    );
    assert!(info_str.contains("session"), "missing session table");
    assert!(info_str.contains("audit_log"), "missing audit_log table");

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    lotadmin_db::run_migrations(&db).await.unwrap();
    lotadmin_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    #[derive(serde::Deserialize)]
    struct MigrationRow {
        #[allow(dead_code)]
        version: u32,
    }
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<MigrationRow> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn role_assertion_rejects_unknown_role() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    lotadmin_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE admin_account SET \
             login_id = 'eve', \
             password_hash = 'x', \
             full_name = 'Eve', \
             role = 'Superuser'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "unknown role should be rejected");
}

#[tokio::test]
async fn unique_index_prevents_duplicate_logins() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    lotadmin_db::run_migrations(&db).await.unwrap();

    db.query(
        "CREATE admin_account SET \
         login_id = 'alice', \
         password_hash = 'x', \
         full_name = 'Alice', \
         role = 'Admin'",
    )
    .await
    .unwrap()
    .check()
    .unwrap();

    let result = db
        .query(
            "CREATE admin_account SET \
             login_id = 'alice', \
             password_hash = 'y', \
             full_name = 'Other Alice', \
             role = 'Viewer'",
        )
        .await
        .unwrap()
        .check();

    assert!(result.is_err(), "duplicate login_id should be rejected");
}
