//! HTTP middleware stack for the site.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. Session layer (tower-sessions with `PostgreSQL` store)
//! 3. `TraceLayer` (request span with `request_id` field)
//! 4. Request ID (records into the span and Sentry scope)
//! 5. Security headers (CSP, frame deny, etc.)
//! 6. Rate limiting on auth and newsletter API routes (governor)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod viewer;

pub use auth::{OptionalUser, RequireUser, clear_current_user, set_current_user};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use viewer::{VIEWER_COOKIE_NAME, ViewerCookie};
