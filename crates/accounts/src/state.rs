//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AccountsConfig;
use crate::db::AccountStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the account store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AccountsConfig,
    accounts: Arc<dyn AccountStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Accounts service configuration
    /// * `accounts` - Account persistence backend
    #[must_use]
    pub fn new(config: AccountsConfig, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, accounts }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &AccountsConfig {
        &self.inner.config
    }

    /// Get a reference to the account store.
    #[must_use]
    pub fn accounts(&self) -> &dyn AccountStore {
        self.inner.accounts.as_ref()
    }
}
