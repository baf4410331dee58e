//! ledger-migrate CLI
//!
//! Command-line tool for applying SQL migration scripts.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use ledger_migrate::prelude::*;

/// Hash-verified SQL migrations tracked in a database ledger.
#[derive(Parser)]
#[command(name = "ledger-migrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database driver: postgres, sql (MySQL) or sqlite.
    #[arg(long, env = "MIGRATE_DRIVER", default_value = "postgres")]
    driver: Driver,

    /// Database host.
    #[arg(long, env = "MIGRATE_HOST", default_value = "localhost")]
    host: String,

    /// Database port (defaults to the driver's standard port).
    #[arg(long, env = "MIGRATE_PORT")]
    port: Option<u16>,

    /// Database user.
    #[arg(short, long, env = "MIGRATE_USER", default_value = "")]
    user: String,

    /// Database password.
    #[arg(long, env = "MIGRATE_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Database name, or file path for SQLite.
    #[arg(short, long, env = "MIGRATE_DATABASE", default_value = "")]
    database: String,

    /// Full connection URL; overrides driver, host, port, user, password and database.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: Option<String>,

    /// Directory containing migration scripts.
    #[arg(short, long, env = "MIGRATE_PATH", default_value = "migrations")]
    path: PathBuf,

    /// Seconds to wait for another run to release the migration lock.
    #[arg(long, default_value_t = 60)]
    lock_timeout: u64,

    /// Deadline in seconds for a single script.
    #[arg(long)]
    script_timeout: Option<u64>,

    /// Deadline in seconds for the whole run.
    #[arg(long)]
    run_timeout: Option<u64>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending migrations (default).
    Migrate,

    /// Show which scripts are applied, pending or changed.
    Status,

    /// Show the migration ledger.
    History,

    /// Create the ledger table only.
    Init,
}

impl Cli {
    fn url(&self) -> Result<(Driver, String)> {
        if let Some(url) = &self.database_url {
            return Ok((Driver::from_url(url)?, url.clone()));
        }
        let port = self.port.unwrap_or(match self.driver {
            Driver::Postgres => 5432,
            Driver::MySql => 3306,
            Driver::Sqlite => 0,
        });
        let config = ConnectionConfig {
            driver: self.driver,
            host: self.host.clone(),
            port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
        };
        Ok((self.driver, config.url()?))
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            lock_timeout: Duration::from_secs(self.lock_timeout),
            script_timeout: self.script_timeout.map(Duration::from_secs),
            run_timeout: self.run_timeout.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = execute(&cli).await {
        error!(error = %e, "Migration failed");
        return Err(e.into());
    }
    Ok(())
}

async fn execute(cli: &Cli) -> Result<()> {
    let (driver, url) = cli.url()?;
    let pool = connect(&url).await?;
    let executor = MigrationExecutor::new(pool, driver.dialect()).options(cli.run_options());
    debug!(dialect = executor.dialect().name(), "Connected");

    match cli.command.as_ref().unwrap_or(&Commands::Migrate) {
        Commands::Init => {
            info!(driver = %driver, "Initializing migration ledger...");
            executor.init().await?;
            info!("Ledger table created successfully.");
        }

        Commands::Migrate => {
            let report = executor.run(&cli.path).await?;
            if report.applied.is_empty() {
                info!("Database is up to date.");
            }
        }

        Commands::Status => {
            let status = executor.status(&cli.path).await?;

            println!("\nMigrations in {}:", cli.path.display());
            println!("{:-<60}", "");
            for script in &status.scripts {
                let marker = match &script.decision {
                    Decision::Verified => "[X]",
                    Decision::Pending => "[ ]",
                    Decision::Drifted { .. } => "[!]",
                };
                println!(" {} {}", marker, script.file_name);
                if let Decision::Drifted { recorded } = &script.decision {
                    println!("     db hash:   {}", recorded);
                    println!("     file hash: {}", script.hash);
                }
            }
            for version in &status.orphaned {
                println!(" [?] version {} (recorded, no file)", version);
            }
            println!();

            info!(
                pending = status.pending().count(),
                drifted = status.has_drift(),
                "Status computed"
            );
        }

        Commands::History => {
            let entries = executor.entries().await?;

            if entries.is_empty() {
                info!("No migrations have been applied yet.");
            } else {
                println!("\nApplied migrations:");
                println!("{:-<60}", "");

                for entry in &entries {
                    let executed_on = entry
                        .executed_on
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        " [X] {} {} ({}, {})",
                        entry.version, entry.description, executed_on, entry.execution_time
                    );
                }
                println!();
            }
        }
    }

    Ok(())
}
