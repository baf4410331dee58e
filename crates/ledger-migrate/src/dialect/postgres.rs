//! PostgreSQL dialect.

use super::{ledger_lock_key, MigrationDialect};

/// PostgreSQL migration dialect.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn id_column_definition(&self) -> &'static str {
        "id SERIAL PRIMARY KEY"
    }

    fn executed_on_definition(&self) -> &'static str {
        "executed_on timestamp NOT NULL DEFAULT current_timestamp"
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn executed_on_as_text(&self) -> &'static str {
        "CAST(executed_on AS TEXT)"
    }

    // Session-level lock; released explicitly or when the connection closes.
    fn try_lock_sql(&self) -> Option<String> {
        Some(format!(
            "SELECT CAST(CASE WHEN pg_try_advisory_lock({}) THEN 1 ELSE 0 END AS BIGINT)",
            ledger_lock_key()
        ))
    }

    fn unlock_sql(&self) -> Option<String> {
        Some(format!(
            "SELECT CAST(CASE WHEN pg_advisory_unlock({}) THEN 1 ELSE 0 END AS BIGINT)",
            ledger_lock_key()
        ))
    }
}
