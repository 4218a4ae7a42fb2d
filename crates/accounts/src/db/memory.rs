//! In-memory account store for tests.

use std::sync::Mutex;

use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;

use school_admin_core::{AccountId, Username};

use super::{AccountStore, RepositoryError};
use crate::models::{Account, NewAccount};

/// Account store holding rows in a `Vec`, with the same uniqueness rule as
/// the database.
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryAccountStore {
    /// Snapshot of every stored account.
    #[allow(clippy::unwrap_used)]
    pub fn all(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }

    /// Number of stored accounts.
    #[allow(clippy::unwrap_used)]
    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }
}

impl AccountStore for MemoryAccountStore {
    #[allow(clippy::unwrap_used)]
    fn create<'a>(
        &'a self,
        account: &'a NewAccount,
    ) -> BoxFuture<'a, Result<Account, RepositoryError>> {
        let result = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.iter().any(|a| a.username == account.username) {
                Err(RepositoryError::Conflict(
                    "username already exists".to_owned(),
                ))
            } else {
                let now = Utc::now();
                let id = i32::try_from(accounts.len() + 1).unwrap();
                let created = Account {
                    id: AccountId::new(id),
                    username: account.username.clone(),
                    email: account.email.clone(),
                    password_hash: account.password_hash.clone(),
                    first_name: account.first_name.clone(),
                    last_name: account.last_name.clone(),
                    phone_number: account.phone_number.clone(),
                    address: account.address.clone(),
                    profile_pic: account.profile_pic.clone(),
                    is_school_admin: account.is_school_admin,
                    created_at: now,
                    updated_at: now,
                };
                accounts.push(created.clone());
                Ok(created)
            }
        };
        futures::future::ready(result).boxed()
    }

    #[allow(clippy::unwrap_used)]
    fn find_by_username<'a>(
        &'a self,
        username: &'a Username,
    ) -> BoxFuture<'a, Result<Option<Account>, RepositoryError>> {
        let found = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| &a.username == username)
            .cloned();
        futures::future::ready(Ok(found)).boxed()
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        futures::future::ready(Ok(())).boxed()
    }
}
