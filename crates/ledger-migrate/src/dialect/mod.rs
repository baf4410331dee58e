//! Database dialect implementations.
//!
//! The engine talks to every driver through `sqlx::Any`, so everything that
//! differs between databases lives here: the ledger DDL, bind placeholders,
//! the ledger listing query and the advisory lock statements.

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use sha2::{Digest, Sha256};

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "migration_schema_version";

/// Columns written by the engine, in insert order.
const LEDGER_INSERT_COLUMNS: [&str; 5] =
    ["version", "description", "file_name", "hash", "execution_time"];

/// Trait for database-specific ledger and locking SQL.
pub trait MigrationDialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Definition of the auto-incrementing `id` column.
    fn id_column_definition(&self) -> &'static str;

    /// Definition of the `executed_on` column with its storage default.
    fn executed_on_definition(&self) -> &'static str;

    /// Table constraints appended after the columns, if any.
    fn table_constraints(&self) -> Option<&'static str> {
        None
    }

    /// Bind placeholder for the 1-based parameter `index`.
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    /// Expression selecting `executed_on` as text.
    fn executed_on_as_text(&self) -> &'static str;

    /// Statement that tries to take the run lock without blocking.
    ///
    /// It must return a single `BIGINT` column: `1` when the lock was taken.
    /// `None` means the database has no advisory locking primitive.
    fn try_lock_sql(&self) -> Option<String>;

    /// Statement releasing the run lock taken by [`Self::try_lock_sql`].
    fn unlock_sql(&self) -> Option<String>;

    /// Create-if-absent DDL for the ledger table.
    fn create_ledger_sql(&self) -> String {
        let mut columns = vec![self.id_column_definition().to_string()];
        columns.extend(
            ["version", "description", "file_name", "hash"]
                .iter()
                .map(|c| format!("{c} varchar(255) NOT NULL")),
        );
        columns.push(self.executed_on_definition().to_string());
        columns.push("execution_time varchar(255) NOT NULL".to_string());
        if let Some(constraints) = self.table_constraints() {
            columns.push(constraints.to_string());
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (\n  {}\n)",
            columns.join(",\n  ")
        )
    }

    /// Parameterized insert of one ledger row.
    fn insert_ledger_sql(&self) -> String {
        let placeholders: Vec<String> = (1..=LEDGER_INSERT_COLUMNS.len())
            .map(|i| self.placeholder(i))
            .collect();
        format!(
            "INSERT INTO {LEDGER_TABLE} ({}) VALUES ({})",
            LEDGER_INSERT_COLUMNS.join(", "),
            placeholders.join(", ")
        )
    }

    /// Query returning `(version, hash)` for every ledger row.
    fn select_recorded_sql(&self) -> String {
        format!("SELECT version, hash FROM {LEDGER_TABLE}")
    }

    /// Query returning every ledger row in insertion order.
    fn select_entries_sql(&self) -> String {
        format!(
            "SELECT version, description, file_name, hash, {} AS executed_on, execution_time \
             FROM {LEDGER_TABLE} ORDER BY id",
            self.executed_on_as_text()
        )
    }
}

/// 64-bit advisory lock key derived from the ledger table name.
#[must_use]
pub fn ledger_lock_key() -> i64 {
    let digest = Sha256::digest(LEDGER_TABLE.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}
