//! Integration tests for schema initialization using in-memory
//! SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    workboard_db::run_migrations(&db).await.unwrap();

    // Verify that key tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("tenant"), "missing tenant table");
    assert!(info_str.contains("workspace"), "missing workspace table");
    assert!(info_str.contains("board"), "missing board table");
    assert!(info_str.contains("app_user"), "missing app_user table");
    assert!(info_str.contains("membership"), "missing membership table");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    workboard_db::run_migrations(&db).await.unwrap();
    // A second run finds the recorded version and applies nothing.
    workboard_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn schema_v1_accessor_returns_ddl() {
    assert!(workboard_db::schema_v1().contains("DEFINE TABLE membership"));
}
