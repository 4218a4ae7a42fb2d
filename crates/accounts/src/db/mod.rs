//! Account storage.
//!
//! # Database: `school_admin`
//!
//! ## Tables
//!
//! - `accounts.account` - School admin accounts (credentials + profile)
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/accounts/migrations/` and run via:
//! ```bash
//! cargo run -p school-admin-cli -- migrate
//! ```
//!
//! Handlers never talk to `sqlx` directly. They go through [`AccountStore`],
//! which `PostgreSQL` implements in [`accounts`] and tests implement in memory.

pub mod accounts;
#[cfg(test)]
pub mod memory;

use std::time::Duration;

use futures::future::BoxFuture;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use school_admin_core::Username;

use crate::models::{Account, NewAccount};

pub use accounts::PgAccountStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage collaborator for accounts.
///
/// Each request performs at most one call that writes, so implementations
/// need no transaction handling beyond a single statement.
pub trait AccountStore: Send + Sync {
    /// Insert a new account and return it with its assigned ID and timestamps.
    ///
    /// Returns `RepositoryError::Conflict` when the username is taken.
    fn create<'a>(
        &'a self,
        account: &'a NewAccount,
    ) -> BoxFuture<'a, Result<Account, RepositoryError>>;

    /// Look up an account by its exact username.
    fn find_by_username<'a>(
        &'a self,
        username: &'a Username,
    ) -> BoxFuture<'a, Result<Option<Account>, RepositoryError>>;

    /// Check that the backing store is reachable.
    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
