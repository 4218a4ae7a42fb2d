//! HTTP route handlers for the accounts service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page (requires login)
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (account store reachable)
//!
//! # Auth
//! GET  /accounts/register        - Registration form
//! POST /accounts/register        - Registration action (multipart)
//! GET  /accounts/login           - Login form
//! POST /accounts/login           - Login action
//! POST /accounts/logout          - Logout action
//!
//! # Account (requires login)
//! GET  /accounts/me/profile-pic  - Current account's profile picture
//! ```

pub mod auth;
pub mod health;
pub mod home;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{MethodRouter, get, post},
};

use crate::config::AccountsConfig;
use crate::middleware::{AuthRateLimit, rate_limit_layer};
use crate::state::AppState;

/// Allowance for the text parts and multipart framing around a profile picture.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Apply the auth quota to a submission handler, when one is configured.
fn rate_limited(
    route: MethodRouter<AppState>,
    limit: Option<&AuthRateLimit>,
) -> MethodRouter<AppState> {
    match limit {
        Some(limit) => route.layer(rate_limit_layer(limit)),
        None => route,
    }
}

/// Create the auth routes router (nested under `/accounts`).
///
/// Only the POST handlers of login and registration draw from `limit`.
pub fn auth_routes(config: &AccountsConfig, limit: Option<&AuthRateLimit>) -> Router<AppState> {
    Router::new()
        .route(
            "/register",
            get(auth::register_page).merge(rate_limited(post(auth::register), limit)),
        )
        .route(
            "/login",
            get(auth::login_page).merge(rate_limited(post(auth::login), limit)),
        )
        .route("/logout", post(auth::logout))
        .layer(DefaultBodyLimit::max(
            config
                .max_profile_pic_bytes
                .saturating_add(FORM_OVERHEAD_BYTES),
        ))
}

/// Create the signed-in account routes router (nested under `/accounts`).
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/me/profile-pic", get(home::profile_pic))
}

/// Create the top-level page and probe routes.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Create all routes for the accounts service.
///
/// `limit` is the auth submission quota; tests pass `None`.
pub fn routes(config: &AccountsConfig, limit: Option<&AuthRateLimit>) -> Router<AppState> {
    Router::new()
        .merge(page_routes())
        .nest("/accounts", auth_routes(config, limit).merge(account_routes()))
}
