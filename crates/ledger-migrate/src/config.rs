//! Connection and run configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::dialect::{MigrationDialect, MySqlDialect, PostgresDialect, SqliteDialect};
use crate::error::{MigrateError, Result};

/// Default bounded wait for the advisory lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(60);

/// Supported database drivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// PostgreSQL.
    Postgres,
    /// MySQL / MariaDB (`sql` on the command line).
    MySql,
    /// SQLite; the database name is a file path.
    Sqlite,
}

impl Driver {
    /// Returns the identifier accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::MySql => "sql",
            Self::Sqlite => "sqlite",
        }
    }

    /// Returns the dialect for this driver.
    #[must_use]
    pub fn dialect(self) -> Box<dyn MigrationDialect> {
        match self {
            Self::Postgres => Box::new(PostgresDialect::new()),
            Self::MySql => Box::new(MySqlDialect::new()),
            Self::Sqlite => Box::new(SqliteDialect::new()),
        }
    }

    /// Infers the driver from a connection URL scheme.
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(MigrateError::InvalidConfig(format!(
                "unsupported database URL scheme '{other}'"
            ))),
        }
    }
}

impl FromStr for Driver {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sql" | "mysql" => Ok(Self::MySql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(MigrateError::InvalidConfig(format!(
                "unknown driver '{other}' (expected postgres, sql or sqlite)"
            ))),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parts needed to reach the target database.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Database driver.
    pub driver: Driver,
    /// Server host (ignored for SQLite).
    pub host: String,
    /// Server port (ignored for SQLite).
    pub port: u16,
    /// User name (ignored for SQLite).
    pub user: String,
    /// Password (ignored for SQLite).
    pub password: String,
    /// Database name, or file path for SQLite.
    pub database: String,
}

impl ConnectionConfig {
    /// Builds the `sqlx` connection URL. Credentials are percent-encoded.
    pub fn url(&self) -> Result<String> {
        if self.database.is_empty() {
            return Err(MigrateError::InvalidConfig(
                "database name must not be empty".into(),
            ));
        }
        if self.driver == Driver::Sqlite {
            return Ok(format!("sqlite:{}?mode=rwc", self.database));
        }

        let scheme = match self.driver {
            Driver::Postgres => "postgres",
            _ => "mysql",
        };
        let mut url = Url::parse(&format!("{scheme}://{}:{}", self.host, self.port))
            .map_err(|e| MigrateError::InvalidConfig(format!("invalid host or port: {e}")))?;
        url.set_username(&self.user)
            .map_err(|()| MigrateError::InvalidConfig("cannot set user name".into()))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| MigrateError::InvalidConfig("cannot set password".into()))?;
        }
        url.path_segments_mut()
            .map_err(|()| MigrateError::InvalidConfig("cannot set database name".into()))?
            .push(&self.database);
        if self.driver == Driver::Postgres {
            url.query_pairs_mut().append_pair("sslmode", "disable");
        }
        Ok(url.into())
    }
}

/// Deadlines applied to a run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// How long to wait for another run to release the advisory lock.
    pub lock_timeout: Duration,
    /// Deadline for executing a single script. The error is raised when it
    /// expires, but the rollback still waits for the running statement.
    pub script_timeout: Option<Duration>,
    /// Deadline for the whole run. An interrupted script is rolled back when
    /// its transaction is dropped.
    pub run_timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            script_timeout: None,
            run_timeout: None,
        }
    }
}
