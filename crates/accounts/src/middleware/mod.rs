//! HTTP middleware stack for the accounts service.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Rate limiting on login/registration submissions (governor)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use auth::{RequireAccount, clear_current_account, set_current_account};
pub use rate_limit::{AuthRateLimit, auth_rate_limiter, rate_limit_layer};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
