//! Business logic services for the accounts service.
//!
//! # Services
//!
//! - `auth` - Account registration and password authentication

pub mod auth;
