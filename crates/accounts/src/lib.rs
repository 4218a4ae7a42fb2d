//! School admin accounts service library.
//!
//! Registration and login for school administrators: form validation,
//! Argon2 password hashing, `PostgreSQL` persistence and cookie sessions.
//! The binary in `main.rs` wires these together; tests drive the same
//! router against in-memory stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
