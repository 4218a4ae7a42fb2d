//! Database migration command.
//!
//! Applies `crates/accounts/migrations/` (the account table and the session
//! table used by `tower-sessions-sqlx-store`).
//!
//! # Environment Variables
//!
//! - `ACCOUNTS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use school_admin_accounts::config::{AccountsConfig, ConfigError};
use school_admin_accounts::db::create_pool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = AccountsConfig::from_env()?;

    tracing::info!("Connecting to accounts database...");
    let pool = create_pool(&config.database_url).await?;

    tracing::info!("Running accounts migrations...");
    sqlx::migrate!("../accounts/migrations").run(&pool).await?;

    tracing::info!("Accounts migrations complete");
    Ok(())
}
