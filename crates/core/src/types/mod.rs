//! Core types for School Admin.
//!
//! This module provides type-safe wrappers for the account's constrained fields.

pub mod email;
pub mod id;
pub mod phone;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use username::{Username, UsernameError};
