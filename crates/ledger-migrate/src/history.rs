//! Migration ledger.
//!
//! This module manages the `migration_schema_version` table: one row per
//! successfully applied script, holding its version and content hash. The
//! ledger is the only source of truth for "already applied".

use std::collections::HashMap;

use chrono::NaiveDateTime;
use sqlx::AnyConnection;

use crate::dialect::MigrationDialect;
use crate::error::Result;

/// A row of the ledger table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Migration version (unique).
    pub version: String,
    /// Description parsed from the file name.
    pub description: String,
    /// Original file name.
    pub file_name: String,
    /// Hex SHA-256 of the script at the time it ran.
    pub hash: String,
    /// When the row was written, if the stored value could be parsed.
    pub executed_on: Option<NaiveDateTime>,
    /// How long the script took, e.g. `1.52ms`.
    pub execution_time: String,
}

/// Values written for a newly applied script.
#[derive(Debug, Clone, Copy)]
pub struct NewLedgerEntry<'a> {
    /// Migration version.
    pub version: &'a str,
    /// Description parsed from the file name.
    pub description: &'a str,
    /// Original file name.
    pub file_name: &'a str,
    /// Hex SHA-256 of the executed content.
    pub hash: &'a str,
    /// Elapsed execution time as text.
    pub execution_time: &'a str,
}

/// Reads and writes the ledger through a single connection.
pub struct MigrationHistory<'d> {
    dialect: &'d dyn MigrationDialect,
}

impl<'d> MigrationHistory<'d> {
    /// Creates a ledger accessor for the given dialect.
    pub fn new(dialect: &'d dyn MigrationDialect) -> Self {
        Self { dialect }
    }

    /// Ensures the ledger table exists.
    pub async fn ensure_table(&self, conn: &mut AnyConnection) -> Result<()> {
        sqlx::query(&self.dialect.create_ledger_sql())
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Returns `version -> hash` for every recorded migration.
    pub async fn load_recorded(
        &self,
        conn: &mut AnyConnection,
    ) -> Result<HashMap<String, String>> {
        let rows: Vec<(String, String)> = sqlx::query_as(&self.dialect.select_recorded_sql())
            .fetch_all(conn)
            .await?;
        Ok(rows.into_iter().collect())
    }

    /// Returns all ledger rows in the order they were written.
    pub async fn entries(&self, conn: &mut AnyConnection) -> Result<Vec<LedgerEntry>> {
        let rows: Vec<(String, String, String, String, Option<String>, String)> =
            sqlx::query_as(&self.dialect.select_entries_sql())
                .fetch_all(conn)
                .await?;

        Ok(rows
            .into_iter()
            .map(
                |(version, description, file_name, hash, executed_on, execution_time)| {
                    LedgerEntry {
                        version,
                        description,
                        file_name,
                        hash,
                        executed_on: executed_on.as_deref().and_then(parse_timestamp),
                        execution_time,
                    }
                },
            )
            .collect())
    }

    /// Inserts one ledger row. Callers run this inside the script's transaction.
    pub async fn record(
        &self,
        conn: &mut AnyConnection,
        entry: NewLedgerEntry<'_>,
    ) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(&self.dialect.insert_ledger_sql())
            .bind(entry.version)
            .bind(entry.description)
            .bind(entry.file_name)
            .bind(entry.hash)
            .bind(entry.execution_time)
            .execute(conn)
            .await?;
        Ok(())
    }
}

/// Parses the text form of `executed_on` as produced by any supported driver.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}
