//! School Admin Core - Shared types library.
//!
//! This crate provides the validated field types used across the School Admin
//! components:
//! - `accounts` - Registration, login and the authenticated home view
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Every type here is a newtype that can only be built
//! through a `parse` constructor, so a value that exists is a valid value.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, usernames, emails, and phone numbers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
