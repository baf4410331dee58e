//! MySQL dialect.
//!
//! MySQL commits DDL implicitly, so a script's transaction only protects its
//! DML statements and the ledger insert.

use super::MigrationDialect;

/// Lock name; `GET_LOCK` is server-wide, so it is scoped by the current schema.
/// Hashed to a fixed 44 characters, under the 64-character lock name limit.
const LOCK_NAME_EXPR: &str = "CONCAT('msv_', SHA1(DATABASE()))";

/// MySQL migration dialect.
#[derive(Debug, Clone, Default)]
pub struct MySqlDialect;

impl MySqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn id_column_definition(&self) -> &'static str {
        "id int AUTO_INCREMENT"
    }

    fn executed_on_definition(&self) -> &'static str {
        "executed_on TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP"
    }

    fn table_constraints(&self) -> Option<&'static str> {
        Some("PRIMARY KEY (id)")
    }

    fn executed_on_as_text(&self) -> &'static str {
        "CAST(executed_on AS CHAR)"
    }

    fn try_lock_sql(&self) -> Option<String> {
        Some(format!(
            "SELECT CAST(COALESCE(GET_LOCK({LOCK_NAME_EXPR}, 0), 0) AS SIGNED)"
        ))
    }

    fn unlock_sql(&self) -> Option<String> {
        Some(format!(
            "SELECT CAST(COALESCE(RELEASE_LOCK({LOCK_NAME_EXPR}), 0) AS SIGNED)"
        ))
    }
}
