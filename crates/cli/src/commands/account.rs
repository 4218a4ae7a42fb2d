//! Account management commands.
//!
//! Accounts created here go through the same validation and hashing as the
//! web registration form.
//!
//! # Environment Variables
//!
//! - `ACCOUNTS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use school_admin_accounts::config::{AccountsConfig, ConfigError};
use school_admin_accounts::db::{PgAccountStore, create_pool};
use school_admin_accounts::forms::{FormErrors, RegistrationForm};
use school_admin_accounts::services::auth::{AccountService, AuthError};
use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// The submitted values broke one or more form rules.
    #[error("Invalid account: {0}")]
    Invalid(String),

    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Build a registration submission from command-line values.
///
/// The password is used for both password fields.
pub fn form(
    username: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    address: String,
) -> RegistrationForm {
    RegistrationForm {
        username,
        email,
        confirm_password: password.clone(),
        password,
        first_name,
        last_name,
        phone_number,
        address,
    }
}

/// Validate `form` and create a school admin account from it.
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `AccountError::Invalid` listing every rule the values break, or
/// `AccountError::Auth` if the username is taken or storage fails.
pub async fn create(form: RegistrationForm) -> Result<i32, AccountError> {
    let registration = form
        .validate(None, 0)
        .map_err(|errors| AccountError::Invalid(describe(&errors)))?;

    let config = AccountsConfig::from_env()?;

    tracing::info!("Connecting to accounts database...");
    let pool = create_pool(&config.database_url).await?;
    let store = PgAccountStore::new(pool);

    let account = AccountService::new(&store).register(registration).await?;

    tracing::info!(
        account_id = %account.id,
        username = %account.username,
        "School admin account created"
    );
    Ok(account.id.as_i32())
}

/// Flatten form errors into one line per message.
fn describe(errors: &FormErrors) -> String {
    let field_messages = errors.field_names().flat_map(|name| {
        errors
            .field(name)
            .iter()
            .map(move |message| format!("{name}: {message}"))
    });

    errors
        .non_field()
        .iter()
        .cloned()
        .chain(field_messages)
        .collect::<Vec<_>>()
        .join("; ")
}
