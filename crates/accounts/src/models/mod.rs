//! Domain models for the accounts service.

pub mod account;
pub mod session;

pub use account::{Account, NewAccount, ProfileImage};
pub use session::{CurrentAccount, keys as session_keys};
