//! End-to-end runs against an on-disk SQLite database.
//!
//! Each run opens its own pool, the way separate deployments would.

use std::path::Path;

use ledger_migrate::prelude::*;
use ledger_migrate::script::content_hash;

async fn executor_for(db: &Path) -> MigrationExecutor {
    let config = ConnectionConfig {
        driver: Driver::Sqlite,
        host: String::new(),
        port: 0,
        user: String::new(),
        password: String::new(),
        database: db.display().to_string(),
    };
    let pool = connect(&config.url().unwrap()).await.unwrap();
    MigrationExecutor::new(pool, config.driver.dialect())
}

fn write(dir: &Path, file_name: &str, sql: &str) {
    std::fs::write(dir.join(file_name), sql).unwrap();
}

#[tokio::test]
async fn repeated_deployments_are_idempotent() {
    let work = tempfile::tempdir().unwrap();
    let db = work.path().join("app.db");
    let scripts = work.path().join("migrations");
    std::fs::create_dir(&scripts).unwrap();

    let users = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);";
    let index = "CREATE INDEX idx_users_name ON users(name);";
    write(&scripts, "1__create_users.sql", users);
    write(&scripts, "2__add_index.sql", index);

    let first = executor_for(&db).await.run(&scripts).await.unwrap();
    assert_eq!(first.applied.len(), 2);

    let executor = executor_for(&db).await;
    let second = executor.run(&scripts).await.unwrap();
    assert!(second.applied.is_empty());
    assert_eq!(second.verified.len(), 2);

    let entries = executor.entries().await.unwrap();
    let versions: Vec<_> = entries.iter().map(|e| e.version.as_str()).collect();
    assert_eq!(versions, ["1", "2"]);
    assert_eq!(entries[0].hash, content_hash(users.as_bytes()));
    assert_eq!(entries[1].hash, content_hash(index.as_bytes()));
}

#[tokio::test]
async fn altered_script_halts_before_later_scripts() {
    let work = tempfile::tempdir().unwrap();
    let db = work.path().join("app.db");
    let scripts = work.path().join("migrations");
    std::fs::create_dir(&scripts).unwrap();

    write(&scripts, "001__a.sql", "CREATE TABLE a (id INTEGER);");
    write(&scripts, "002__b.sql", "CREATE TABLE b (id INTEGER);");
    executor_for(&db).await.run(&scripts).await.unwrap();

    write(&scripts, "002__b.sql", "CREATE TABLE b (id INTEGER, note TEXT);");
    write(&scripts, "003__c.sql", "CREATE TABLE c (id INTEGER);");

    let executor = executor_for(&db).await;
    let status = executor.status(&scripts).await.unwrap();
    assert_eq!(status.scripts[0].decision, Decision::Verified);
    assert!(matches!(status.scripts[1].decision, Decision::Drifted { .. }));
    assert_eq!(status.scripts[2].decision, Decision::Pending);

    let err = executor.run(&scripts).await.unwrap_err();
    assert_eq!(err.version(), Some("002"));
    assert!(matches!(err, MigrateError::IntegrityMismatch { .. }));
    assert_eq!(executor.entries().await.unwrap().len(), 2);
}
