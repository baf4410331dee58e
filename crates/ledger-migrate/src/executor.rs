//! Migration executor.
//!
//! This module reconciles the scripts on disk against the ledger and applies
//! the pending ones, one transaction per script.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyConnection, AnyPool, Connection, Transaction};
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::config::RunOptions;
use crate::dialect::MigrationDialect;
use crate::error::{MigrateError, Result};
use crate::history::{LedgerEntry, MigrationHistory, NewLedgerEntry};
use crate::script::{self, MigrationScript, compare_versions};

/// Pause between attempts to take a busy advisory lock.
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Opens a single-connection pool for `url`.
///
/// Locks are session-scoped, so a run must stay on one connection.
pub async fn connect(url: &str) -> Result<AnyPool> {
    install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await?;
    Ok(pool)
}

/// What to do with a script, given the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Recorded with the same hash; nothing to do.
    Verified,
    /// Not recorded; must be applied.
    Pending,
    /// Recorded with a different hash; the run must halt.
    Drifted {
        /// Hash stored in the ledger.
        recorded: String,
    },
}

/// Classifies one script against the recorded `version -> hash` map.
#[must_use]
pub fn reconcile(version: &str, hash: &str, recorded: &HashMap<String, String>) -> Decision {
    match recorded.get(version) {
        Some(stored) if stored == hash => Decision::Verified,
        Some(stored) => Decision::Drifted {
            recorded: stored.clone(),
        },
        None => Decision::Pending,
    }
}

/// Reconciliation result for one script, without applying anything.
#[derive(Debug, Clone)]
pub struct ScriptStatus {
    /// Migration version.
    pub version: String,
    /// Original file name.
    pub file_name: String,
    /// Hex SHA-256 of the file as it is now.
    pub hash: String,
    /// Outcome of reconciling against the ledger.
    pub decision: Decision,
}

/// Reconciliation of a whole script set.
#[derive(Debug, Clone, Default)]
pub struct MigrationStatus {
    /// Every script, in apply order.
    pub scripts: Vec<ScriptStatus>,
    /// Recorded versions with no matching script. Informational only.
    pub orphaned: Vec<String>,
}

impl MigrationStatus {
    /// Scripts that a run would apply, assuming nothing drifts before them.
    pub fn pending(&self) -> impl Iterator<Item = &ScriptStatus> {
        self.scripts
            .iter()
            .filter(|s| s.decision == Decision::Pending)
    }

    /// Whether a run would halt on an integrity mismatch.
    #[must_use]
    pub fn has_drift(&self) -> bool {
        self.scripts
            .iter()
            .any(|s| matches!(s.decision, Decision::Drifted { .. }))
    }
}

/// Classifies every script in order and lists orphaned ledger versions.
#[must_use]
pub fn plan(scripts: &[MigrationScript], recorded: &HashMap<String, String>) -> MigrationStatus {
    let statuses = scripts
        .iter()
        .map(|s| {
            let hash = s.hash();
            ScriptStatus {
                decision: reconcile(&s.version, &hash, recorded),
                version: s.version.clone(),
                file_name: s.file_name.clone(),
                hash,
            }
        })
        .collect();

    let mut orphaned: Vec<String> = recorded
        .keys()
        .filter(|v| !scripts.iter().any(|s| &s.version == *v))
        .cloned()
        .collect();
    orphaned.sort_by(|a, b| compare_versions(a, b));

    MigrationStatus {
        scripts: statuses,
        orphaned,
    }
}

/// A script applied during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedScript {
    /// Migration version.
    pub version: String,
    /// Original file name.
    pub file_name: String,
    /// Hex SHA-256 recorded in the ledger.
    pub hash: String,
    /// Execution time as stored in the ledger.
    pub execution_time: String,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    /// Versions already applied and verified unchanged.
    pub verified: Vec<String>,
    /// Scripts applied by this run, in order.
    pub applied: Vec<AppliedScript>,
}

/// Executes migration scripts against a database.
pub struct MigrationExecutor {
    pool: AnyPool,
    dialect: Box<dyn MigrationDialect>,
    options: RunOptions,
}

impl MigrationExecutor {
    /// Creates a new migration executor.
    pub fn new(pool: AnyPool, dialect: Box<dyn MigrationDialect>) -> Self {
        Self {
            pool,
            dialect,
            options: RunOptions::default(),
        }
    }

    /// Sets lock and execution deadlines.
    #[must_use]
    pub fn options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the dialect.
    #[must_use]
    pub fn dialect(&self) -> &dyn MigrationDialect {
        self.dialect.as_ref()
    }

    fn history(&self) -> MigrationHistory<'_> {
        MigrationHistory::new(self.dialect.as_ref())
    }

    /// Ensures the ledger table exists.
    pub async fn init(&self) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        self.history().ensure_table(&mut conn).await
    }

    /// Returns every ledger row.
    pub async fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let mut conn = self.pool.acquire().await?;
        let history = self.history();
        history.ensure_table(&mut conn).await?;
        history.entries(&mut conn).await
    }

    /// Reconciles the scripts in `dir` against the ledger without applying anything.
    pub async fn status(&self, dir: &Path) -> Result<MigrationStatus> {
        let mut conn = self.pool.acquire().await?;
        let history = self.history();
        history.ensure_table(&mut conn).await?;
        let recorded = history.load_recorded(&mut conn).await?;
        let scripts = script::list_scripts(dir)?;
        Ok(plan(&scripts, &recorded))
    }

    /// Applies every pending script in `dir` under the run lock.
    pub async fn run(&self, dir: &Path) -> Result<MigrationReport> {
        let mut conn = self.pool.acquire().await?;
        self.acquire_lock(&mut conn).await?;

        let result = match self.options.run_timeout {
            Some(limit) => timeout(limit, self.run_locked(&mut conn, dir))
                .await
                .unwrap_or_else(|_| Err(MigrateError::RunTimeout(limit))),
            None => self.run_locked(&mut conn, dir).await,
        };

        self.release_lock(&mut conn).await;
        result
    }

    async fn run_locked(&self, conn: &mut AnyConnection, dir: &Path) -> Result<MigrationReport> {
        let history = self.history();
        history.ensure_table(conn).await?;
        let recorded = history.load_recorded(conn).await?;
        let scripts = script::list_scripts(dir)?;
        let report = self.apply_scripts(conn, &scripts, &recorded).await?;

        info!(
            verified = report.verified.len(),
            applied = report.applied.len(),
            "Migration completed"
        );
        Ok(report)
    }

    /// Reconciles `scripts` in order, applying pending ones. Halts on the
    /// first drifted or failing script.
    pub async fn apply_scripts(
        &self,
        conn: &mut AnyConnection,
        scripts: &[MigrationScript],
        recorded: &HashMap<String, String>,
    ) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();

        for script in scripts {
            let hash = script.hash();
            match reconcile(&script.version, &hash, recorded) {
                Decision::Verified => {
                    info!(version = %script.version, hash = %hash, "Migration checked");
                    report.verified.push(script.version.clone());
                }
                Decision::Drifted { recorded } => {
                    error!(
                        version = %script.version,
                        file_name = %script.file_name,
                        db_hash = %recorded,
                        file_hash = %hash,
                        "Migration changed after it was applied"
                    );
                    return Err(MigrateError::IntegrityMismatch {
                        version: script.version.clone(),
                        file_name: script.file_name.clone(),
                        recorded,
                        computed: hash,
                    });
                }
                Decision::Pending => {
                    let applied = self.apply(conn, script, &hash).await?;
                    report.applied.push(applied);
                }
            }
        }

        Ok(report)
    }

    /// Executes one script and records it in the ledger, atomically.
    pub async fn apply(
        &self,
        conn: &mut AnyConnection,
        script: &MigrationScript,
        hash: &str,
    ) -> Result<AppliedScript> {
        info!(
            version = %script.version,
            file_name = %script.file_name,
            "Applying migration"
        );

        let sql = script.sql()?;
        let mut tx = conn.begin().await?;
        debug!(version = %script.version, sql = %sql, "Executing SQL");

        let started = Instant::now();
        let executed = match self.options.script_timeout {
            Some(limit) => match timeout(limit, sqlx::raw_sql(sql).execute(&mut *tx)).await {
                Ok(result) => result.map_err(|source| execution_failed(script, source)),
                Err(_) => Err(MigrateError::ScriptTimeout {
                    version: script.version.clone(),
                    timeout: limit,
                }),
            },
            None => sqlx::raw_sql(sql)
                .execute(&mut *tx)
                .await
                .map_err(|source| execution_failed(script, source)),
        };
        let execution_time = format!("{:?}", started.elapsed());

        if let Err(cause) = executed {
            return Err(rollback(tx, &script.version, cause).await);
        }

        let entry = NewLedgerEntry {
            version: &script.version,
            description: &script.description,
            file_name: &script.file_name,
            hash,
            execution_time: &execution_time,
        };
        if let Err(source) = self.history().record(&mut tx, entry).await {
            let cause = MigrateError::LedgerInsertFailed {
                version: script.version.clone(),
                source,
            };
            return Err(rollback(tx, &script.version, cause).await);
        }

        tx.commit()
            .await
            .map_err(|source| MigrateError::CommitFailed {
                version: script.version.clone(),
                source,
            })?;

        info!(
            version = %script.version,
            hash = %hash,
            execution_time = %execution_time,
            "Successfully migrated"
        );

        Ok(AppliedScript {
            version: script.version.clone(),
            file_name: script.file_name.clone(),
            hash: hash.to_string(),
            execution_time,
        })
    }

    async fn acquire_lock(&self, conn: &mut AnyConnection) -> Result<()> {
        let Some(sql) = self.dialect.try_lock_sql() else {
            debug!(dialect = self.dialect.name(), "No advisory lock for dialect");
            return Ok(());
        };

        let deadline = Instant::now() + self.options.lock_timeout;
        loop {
            let acquired: i64 = sqlx::query_scalar(&sql).fetch_one(&mut *conn).await?;
            if acquired == 1 {
                debug!("Acquired migration lock");
                return Ok(());
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(MigrateError::LockTimeout(self.options.lock_timeout));
            }
            info!("Migration lock held by another run, waiting");
            sleep(LOCK_RETRY_INTERVAL.min(deadline - now)).await;
        }
    }

    async fn release_lock(&self, conn: &mut PoolConnection<Any>) {
        let Some(sql) = self.dialect.unlock_sql() else {
            return;
        };

        match sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&mut **conn)
            .await
        {
            Ok(1) => debug!("Released migration lock"),
            Ok(_) => warn!("Migration lock was not held at release"),
            Err(e) => {
                // Session locks die with the connection.
                warn!(error = %e, "Failed to release migration lock, closing connection");
                conn.close_on_drop();
            }
        }
    }
}

fn execution_failed(script: &MigrationScript, source: sqlx::Error) -> MigrateError {
    MigrateError::ExecutionFailed {
        version: script.version.clone(),
        file_name: script.file_name.clone(),
        source,
    }
}

/// Rolls back `tx` after `cause`. Returns the error to surface.
async fn rollback(tx: Transaction<'_, Any>, version: &str, cause: MigrateError) -> MigrateError {
    match tx.rollback().await {
        Ok(()) => {
            warn!(version = %version, error = %cause, "Migration rolled back");
            cause
        }
        Err(rollback) => {
            error!(
                version = %version,
                error = %cause,
                rollback_error = %rollback,
                "Rollback failed, database state is inconsistent"
            );
            MigrateError::RollbackFailed {
                version: version.to_string(),
                cause: Box::new(cause),
                rollback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SqliteDialect;
    use crate::script::content_hash;

    async fn create_test_pool() -> AnyPool {
        install_default_drivers();
        AnyPoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory SQLite pool")
    }

    async fn create_executor() -> (MigrationExecutor, AnyPool) {
        let pool = create_test_pool().await;
        let executor = MigrationExecutor::new(pool.clone(), Box::new(SqliteDialect::new()));
        (executor, pool)
    }

    fn write_script(dir: &Path, file_name: &str, sql: &str) {
        std::fs::write(dir.join(file_name), sql).unwrap();
    }

    async fn table_exists(pool: &AnyPool, name: &str) -> bool {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name=?")
                .bind(name)
                .fetch_optional(pool)
                .await
                .unwrap();
        row.is_some()
    }

    fn recorded(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(v, h)| ((*v).to_string(), (*h).to_string()))
            .collect()
    }

    #[test]
    fn test_reconcile() {
        let map = recorded(&[("1", "aaa")]);
        assert_eq!(reconcile("1", "aaa", &map), Decision::Verified);
        assert_eq!(
            reconcile("1", "bbb", &map),
            Decision::Drifted {
                recorded: "aaa".to_string()
            }
        );
        assert_eq!(reconcile("2", "aaa", &map), Decision::Pending);
    }

    #[test]
    fn test_plan_reports_orphans() {
        let scripts = vec![
            MigrationScript::new("2__b.sql", "SELECT 2;").unwrap(),
            MigrationScript::new("3__c.sql", "SELECT 3;").unwrap(),
        ];
        let verified_hash = content_hash(b"SELECT 2;");
        let map = recorded(&[("1", "abc123"), ("2", verified_hash.as_str()), ("3", "stale")]);

        let status = plan(&scripts, &map);
        assert_eq!(status.orphaned, vec!["1".to_string()]);
        assert_eq!(status.scripts[0].decision, Decision::Verified);
        assert!(status.has_drift());
        assert_eq!(status.pending().count(), 0);
    }

    #[tokio::test]
    async fn test_first_run_applies_all() {
        let (executor, pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        let users = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);";
        let index = "CREATE INDEX idx_users_name ON users(name);";
        write_script(dir.path(), "1__create_users.sql", users);
        write_script(dir.path(), "2__add_index.sql", index);

        let report = executor.run(dir.path()).await.unwrap();
        assert!(report.verified.is_empty());
        assert_eq!(report.applied.len(), 2);
        assert_eq!(report.applied[0].version, "1");
        assert_eq!(report.applied[1].version, "2");
        assert!(table_exists(&pool, "users").await);

        let entries = executor.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].version, "1");
        assert_eq!(entries[0].description, "create_users");
        assert_eq!(entries[0].file_name, "1__create_users.sql");
        assert_eq!(entries[0].hash, content_hash(users.as_bytes()));
        assert_eq!(entries[1].hash, content_hash(index.as_bytes()));
        assert!(!entries[0].execution_time.is_empty());
    }

    #[tokio::test]
    async fn test_second_run_is_noop() {
        let (executor, _pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "1__create_users.sql", "CREATE TABLE users (id INTEGER);");
        write_script(dir.path(), "2__add_index.sql", "CREATE INDEX i ON users(id);");

        executor.run(dir.path()).await.unwrap();
        let before = executor.entries().await.unwrap();

        let report = executor.run(dir.path()).await.unwrap();
        assert!(report.applied.is_empty());
        assert_eq!(report.verified, vec!["1".to_string(), "2".to_string()]);
        assert_eq!(executor.entries().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_integrity_mismatch_halts_run() {
        let (executor, pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "001__a.sql", "CREATE TABLE a (id INTEGER);");
        write_script(dir.path(), "002__b.sql", "CREATE TABLE b (id INTEGER);");
        executor.run(dir.path()).await.unwrap();

        write_script(dir.path(), "002__b.sql", "CREATE TABLE b (id INTEGER, x TEXT);");
        write_script(dir.path(), "003__c.sql", "CREATE TABLE c (id INTEGER);");

        let err = executor.run(dir.path()).await.unwrap_err();
        match err {
            MigrateError::IntegrityMismatch {
                version,
                recorded,
                computed,
                ..
            } => {
                assert_eq!(version, "002");
                assert_ne!(recorded, computed);
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(!table_exists(&pool, "c").await);
        assert_eq!(executor.entries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_execution_failure_rolls_back_and_retries() {
        let (executor, pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "1__a.sql", "CREATE TABLE a (id INTEGER);");
        write_script(
            dir.path(),
            "2__b.sql",
            "CREATE TABLE b (id INTEGER); INSERT INTO missing (id) VALUES (1);",
        );

        let err = executor.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, MigrateError::ExecutionFailed { ref version, .. } if version == "2"));
        assert!(table_exists(&pool, "a").await);
        assert!(!table_exists(&pool, "b").await);

        let entries = executor.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].version, "1");

        write_script(dir.path(), "2__b.sql", "CREATE TABLE b (id INTEGER);");
        let report = executor.run(dir.path()).await.unwrap();
        assert_eq!(report.verified, vec!["1".to_string()]);
        assert_eq!(report.applied.len(), 1);
        assert!(table_exists(&pool, "b").await);
    }

    #[tokio::test]
    async fn test_ledger_insert_failure_rolls_back_script() {
        let (executor, pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(
            dir.path(),
            "1__drop_ledger.sql",
            "CREATE TABLE t (id INTEGER); DROP TABLE migration_schema_version;",
        );

        let err = executor.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, MigrateError::LedgerInsertFailed { .. }));
        assert!(table_exists(&pool, "migration_schema_version").await);
        assert!(!table_exists(&pool, "t").await);
    }

    #[tokio::test]
    async fn test_unknown_recorded_version_is_ignored() {
        let (executor, _pool) = create_executor().await;
        executor.init().await.unwrap();
        {
            let mut conn = executor.pool.acquire().await.unwrap();
            let entry = NewLedgerEntry {
                version: "1",
                description: "gone",
                file_name: "1__gone.sql",
                hash: "abc123",
                execution_time: "1ms",
            };
            executor.history().record(&mut conn, entry).await.unwrap();
        }

        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "2__b.sql", "CREATE TABLE b (id INTEGER);");

        let status = executor.status(dir.path()).await.unwrap();
        assert_eq!(status.orphaned, vec!["1".to_string()]);
        assert_eq!(status.pending().count(), 1);

        let report = executor.run(dir.path()).await.unwrap();
        assert_eq!(report.applied.len(), 1);
        assert_eq!(executor.entries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_applies_in_numeric_version_order() {
        let (executor, _pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "10__add_email.sql", "ALTER TABLE users ADD COLUMN email TEXT;");
        write_script(dir.path(), "9__create_users.sql", "CREATE TABLE users (id INTEGER);");

        let report = executor.run(dir.path()).await.unwrap();
        let versions: Vec<_> = report.applied.iter().map(|a| a.version.as_str()).collect();
        assert_eq!(versions, ["9", "10"]);
    }

    #[tokio::test]
    async fn test_duplicate_versions_apply_nothing() {
        let (executor, pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "1__a.sql", "CREATE TABLE a (id INTEGER);");
        write_script(dir.path(), "1__b.sql", "CREATE TABLE b (id INTEGER);");

        let err = executor.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, MigrateError::DuplicateVersion { .. }));
        assert!(!table_exists(&pool, "a").await);
        assert!(executor.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_does_not_apply() {
        let (executor, pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "1__a.sql", "CREATE TABLE a (id INTEGER);");

        let status = executor.status(dir.path()).await.unwrap();
        assert_eq!(status.scripts.len(), 1);
        assert_eq!(status.scripts[0].decision, Decision::Pending);
        assert!(!status.has_drift());
        assert!(!table_exists(&pool, "a").await);
    }

    /// Creates `s` and fills it with enough rows to outlast a short deadline.
    const SLOW_SCRIPT: &str = "CREATE TABLE s (n INTEGER); \
        WITH RECURSIVE c(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM c WHERE n < 2000000) \
        INSERT INTO s SELECT n FROM c;";

    #[tokio::test]
    async fn test_non_utf8_script_applies_nothing() {
        let (executor, pool) = create_executor().await;
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "1__create_t.sql", "CREATE TABLE t (name TEXT);");
        std::fs::write(
            dir.path().join("2__seed_t.sql"),
            b"INSERT INTO t VALUES ('caf\xE9');",
        )
        .unwrap();

        let err = executor.run(dir.path()).await.unwrap_err();
        assert!(matches!(
            err,
            MigrateError::NonUtf8Script { ref file_name, .. } if file_name == "2__seed_t.sql"
        ));
        assert!(!table_exists(&pool, "t").await);
        assert!(executor.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_script_timeout_rolls_back() {
        let pool = create_test_pool().await;
        let executor = MigrationExecutor::new(pool.clone(), Box::new(SqliteDialect::new()))
            .options(RunOptions {
                script_timeout: Some(Duration::from_millis(10)),
                ..RunOptions::default()
            });
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "1__fill_s.sql", SLOW_SCRIPT);

        let err = executor.run(dir.path()).await.unwrap_err();
        assert!(matches!(
            err,
            MigrateError::ScriptTimeout { ref version, .. } if version == "1"
        ));
        assert_eq!(err.version(), Some("1"));
        assert!(!table_exists(&pool, "s").await);
        assert!(executor.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_timeout_rolls_back() {
        let pool = create_test_pool().await;
        let executor = MigrationExecutor::new(pool.clone(), Box::new(SqliteDialect::new()))
            .options(RunOptions {
                run_timeout: Some(Duration::from_millis(10)),
                ..RunOptions::default()
            });
        let dir = tempfile::tempdir().unwrap();
        write_script(dir.path(), "1__fill_s.sql", SLOW_SCRIPT);

        let err = executor.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, MigrateError::RunTimeout(limit) if limit == Duration::from_millis(10)));
        assert!(!table_exists(&pool, "s").await);
        assert!(executor.entries().await.unwrap().is_empty());
    }
}
