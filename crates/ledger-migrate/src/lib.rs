//! Hash-verified SQL migrations tracked in a database ledger.
//!
//! `ledger-migrate` applies plain SQL files from a directory to PostgreSQL,
//! MySQL or SQLite and records each one in the `migration_schema_version`
//! table, so that:
//! - Re-running the same deployment against the same database is a no-op
//! - A script that changed after it was applied halts the run
//! - A script and its ledger row commit together, or not at all
//!
//! # Architecture
//!
//! - **Script loader** ([`script`]) - Lists `<version>__<description>.<ext>` files,
//!   sorted by version
//! - **Ledger** ([`history`]) - Creates the ledger table and reads recorded hashes
//! - **Executor** ([`executor`]) - Reconciles scripts against the ledger and
//!   applies pending ones under an advisory lock
//! - **Dialect** ([`dialect`]) - Database-specific ledger DDL and lock statements
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_migrate::prelude::*;
//!
//! let config = ConnectionConfig {
//!     driver: Driver::Postgres,
//!     host: "localhost".into(),
//!     port: 5432,
//!     user: "deploy".into(),
//!     password: "secret".into(),
//!     database: "app".into(),
//! };
//! let pool = connect(&config.url()?).await?;
//! let executor = MigrationExecutor::new(pool, config.driver.dialect());
//! let report = executor.run(Path::new("migrations")).await?;
//! println!("applied {} migrations", report.applied.len());
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Apply pending migrations
//! ledger-migrate --driver postgres --host localhost --port 5432 \
//!     --user deploy --password secret --database app --path migrations migrate
//!
//! # Show which scripts are applied, pending or changed
//! ledger-migrate --database-url sqlite:app.db --path migrations status
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod history;
pub mod script;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ConnectionConfig, Driver, RunOptions};
    pub use crate::dialect::{MigrationDialect, MySqlDialect, PostgresDialect, SqliteDialect};
    pub use crate::error::{MigrateError, Result};
    pub use crate::executor::{
        connect, AppliedScript, Decision, MigrationExecutor, MigrationReport, MigrationStatus,
    };
    pub use crate::history::{LedgerEntry, MigrationHistory};
    pub use crate::script::MigrationScript;
}
