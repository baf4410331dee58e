//! Error types for the migration engine.

use std::path::PathBuf;
use std::time::Duration;

/// Errors that can occur while reconciling and applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Database error outside of a script's transaction (connect, ledger setup, ledger read).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The migrations directory could not be listed.
    #[error("Failed to list migrations directory '{path}': {source}")]
    ListDirectory {
        /// Directory that was being listed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A migration script could not be read.
    #[error("Failed to read migration script '{path}': {source}")]
    ReadScript {
        /// Path of the script.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// No migrations directory found.
    #[error("Migrations directory not found: {0}")]
    MigrationsDirNotFound(PathBuf),

    /// A file name does not follow `<version>__<description>.<extension>`.
    #[error("Malformed migration file name '{file_name}': {reason}")]
    MalformedFileName {
        /// The offending file name.
        file_name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A script is not valid UTF-8 and cannot be sent to the database unchanged.
    #[error("Migration script '{file_name}' is not valid UTF-8: {source}")]
    NonUtf8Script {
        /// File name of the script.
        file_name: String,
        /// Position of the first invalid byte.
        source: std::str::Utf8Error,
    },

    /// Two scripts carry the same version.
    #[error("Duplicate migration version '{version}' in '{first}' and '{second}'")]
    DuplicateVersion {
        /// The shared version.
        version: String,
        /// File seen first (in version order).
        first: String,
        /// File seen second.
        second: String,
    },

    /// An applied script was modified after it ran.
    #[error(
        "Migration error for version id {version} ({file_name}), db hash: {recorded}, file hash: {computed}"
    )]
    IntegrityMismatch {
        /// Version of the drifted script.
        version: String,
        /// File name of the drifted script.
        file_name: String,
        /// Hash stored in the ledger.
        recorded: String,
        /// Hash of the file as it is now.
        computed: String,
    },

    /// Script SQL failed; the transaction was rolled back.
    #[error("Migration {version} ({file_name}) failed: {source}")]
    ExecutionFailed {
        /// Version of the failing script.
        version: String,
        /// File name of the failing script.
        file_name: String,
        /// Database error raised by the script.
        source: sqlx::Error,
    },

    /// The ledger row could not be written; the transaction was rolled back.
    #[error("Error in updating schema ledger for version {version}: {source}")]
    LedgerInsertFailed {
        /// Version being recorded.
        version: String,
        /// Database error raised by the insert.
        source: sqlx::Error,
    },

    /// Commit failed; no durable ledger effect can be assumed.
    #[error("Commit failed for version {version}: {source}")]
    CommitFailed {
        /// Version being committed.
        version: String,
        /// Database error raised by the commit.
        source: sqlx::Error,
    },

    /// A script exceeded its deadline and was rolled back.
    #[error("Migration {version} timed out after {timeout:?}")]
    ScriptTimeout {
        /// Version of the slow script.
        version: String,
        /// Configured deadline.
        timeout: Duration,
    },

    /// The whole run exceeded its deadline.
    #[error("Migration run timed out after {0:?}")]
    RunTimeout(Duration),

    /// Another run holds the advisory lock.
    #[error("Could not acquire migration lock within {0:?}")]
    LockTimeout(Duration),

    /// Rolling back a failed script also failed. The database state is unknown.
    #[error(
        "Inconsistent state for version {version}: rollback failed ({rollback}) after: {cause}"
    )]
    RollbackFailed {
        /// Version whose transaction could not be rolled back.
        version: String,
        /// The error that triggered the rollback.
        cause: Box<MigrateError>,
        /// The rollback error.
        rollback: sqlx::Error,
    },

    /// Invalid connection or run configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MigrateError {
    /// Returns the version this error is about, if any.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        match self {
            Self::IntegrityMismatch { version, .. }
            | Self::ExecutionFailed { version, .. }
            | Self::LedgerInsertFailed { version, .. }
            | Self::CommitFailed { version, .. }
            | Self::ScriptTimeout { version, .. }
            | Self::RollbackFailed { version, .. }
            | Self::DuplicateVersion { version, .. } => Some(version),
            _ => None,
        }
    }
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
