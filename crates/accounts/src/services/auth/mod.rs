//! Authentication service.
//!
//! Creates accounts from validated registrations and checks login
//! credentials. Passwords are hashed with Argon2id and only ever compared
//! through the hash.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::ExposeSecret;

use school_admin_core::Username;

use crate::db::{AccountStore, RepositoryError};
use crate::forms::{Credentials, ValidRegistration};
use crate::models::{Account, NewAccount};

/// Authentication service.
pub struct AccountService<'a> {
    accounts: &'a dyn AccountStore,
}

impl<'a> AccountService<'a> {
    /// Create a new authentication service over an account store.
    #[must_use]
    pub const fn new(accounts: &'a dyn AccountStore) -> Self {
        Self { accounts }
    }

    /// Persist a validated registration as a new school admin account.
    ///
    /// The plaintext password is replaced by its hash before anything is
    /// written. Exactly one insert is performed.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UsernameTaken` if the username is already registered.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    /// Returns `AuthError::Repository` for other storage failures.
    pub async fn register(&self, registration: ValidRegistration) -> Result<Account, AuthError> {
        let password_hash = hash_password(registration.password.expose_secret())?;

        let new_account = NewAccount {
            username: registration.username,
            email: registration.email,
            password_hash,
            first_name: registration.first_name,
            last_name: registration.last_name,
            phone_number: registration.phone_number,
            address: registration.address,
            profile_pic: registration.profile_pic,
            is_school_admin: true,
        };

        let account = self
            .accounts
            .create(&new_account)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UsernameTaken,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(
            account_id = %account.id,
            username = %account.username,
            "Registered school admin account"
        );

        Ok(account)
    }

    /// Check a username and password against the stored hash.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account has the username
    /// or the password does not match.
    /// Returns `AuthError::Repository` if the lookup fails.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Account, AuthError> {
        let Ok(username) = Username::parse(&credentials.username) else {
            return Err(AuthError::InvalidCredentials);
        };

        let account = self
            .accounts
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(credentials.password.expose_secret(), &account.password_hash)?;

        Ok(account)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::db::memory::MemoryAccountStore;
    use crate::forms::RegistrationForm;

    fn registration(username: &str, password: &str) -> ValidRegistration {
        RegistrationForm {
            username: username.to_owned(),
            email: format!("{username}@x.com"),
            password: password.to_owned(),
            confirm_password: password.to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "L".to_owned(),
            phone_number: "1234567890".to_owned(),
            address: "1 Rd".to_owned(),
        }
        .validate(None, 1024)
        .unwrap()
    }

    fn credentials(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_owned(),
            password: SecretString::from(password.to_owned()),
        }
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let store = MemoryAccountStore::default();
        let service = AccountService::new(&store);

        let account = service.register(registration("ada", "p1")).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(account.is_school_admin);
        let stored = store.all().remove(0);
        assert_ne!(stored.password_hash, "p1");
        assert!(!stored.password_hash.contains("p1"));
        assert!(stored.password_hash.starts_with("$argon2id$"));
        verify_password("p1", &stored.password_hash).unwrap();
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let store = MemoryAccountStore::default();
        let service = AccountService::new(&store);

        service.register(registration("ada", "p1")).await.unwrap();
        let result = service.register(registration("ada", "p2")).await;

        assert!(matches!(result, Err(AuthError::UsernameTaken)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let store = MemoryAccountStore::default();
        let service = AccountService::new(&store);
        let registered = service.register(registration("ada", "p1")).await.unwrap();

        let account = service.authenticate(&credentials("ada", "p1")).await.unwrap();
        assert_eq!(account.id, registered.id);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let store = MemoryAccountStore::default();
        let service = AccountService::new(&store);
        service.register(registration("ada", "p1")).await.unwrap();

        for (username, password) in [("ada", "wrong"), ("grace", "p1"), ("not valid", "p1")] {
            let result = service.authenticate(&credentials(username, password)).await;
            assert!(
                matches!(result, Err(AuthError::InvalidCredentials)),
                "{username}/{password}"
            );
        }
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("p1").unwrap();
        let second = hash_password("p1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("p1", &first).is_ok());
        assert!(verify_password("p1", &second).is_ok());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("p1", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
