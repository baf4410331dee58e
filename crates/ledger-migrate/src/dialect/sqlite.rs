//! SQLite dialect.
//!
//! SQLite has no advisory locks. Writers are serialized by the database file
//! lock, so the run lock is a no-op.

use super::MigrationDialect;

/// SQLite migration dialect.
#[derive(Debug, Clone, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MigrationDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn id_column_definition(&self) -> &'static str {
        "id INTEGER PRIMARY KEY AUTOINCREMENT"
    }

    fn executed_on_definition(&self) -> &'static str {
        "executed_on TEXT NOT NULL DEFAULT (datetime('now'))"
    }

    fn executed_on_as_text(&self) -> &'static str {
        "executed_on"
    }

    fn try_lock_sql(&self) -> Option<String> {
        None
    }

    fn unlock_sql(&self) -> Option<String> {
        None
    }
}
