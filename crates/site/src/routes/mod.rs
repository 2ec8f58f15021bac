//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Post listing
//! GET  /posts/{slug}             - Post page with engagement widgets
//! GET  /about                    - About page
//! GET  /newsletter               - Newsletter page
//! POST /newsletter               - Newsletter form action
//!
//! # Auth (HTML forms)
//! GET  /auth/sign-in             - Sign-in page
//! POST /auth/sign-in             - Sign-in action
//! GET  /auth/sign-up             - Sign-up page
//! POST /auth/sign-up             - Sign-up action
//! POST /auth/sign-out            - Sign-out action
//!
//! # JSON API
//! POST /api/auth/sign-up         - Create account
//! POST /api/auth/sign-in         - Start session
//! POST /api/auth/sign-out        - End session
//! GET  /api/auth/session         - Current user or null
//! POST /api/newsletter           - Subscribe
//! GET  /api/posts/{slug}/view    - View count
//! POST /api/posts/{slug}/view    - Record a view
//! GET  /api/posts/{slug}/likes   - Like count and membership
//! POST /api/posts/{slug}/likes   - Toggle like (auth)
//! GET  /api/posts/{slug}/comments - List comments
//! POST /api/posts/{slug}/comments - Add comment (auth)
//! ```

pub mod api;
pub mod auth;
pub mod home;
pub mod newsletter;
pub mod pages;
pub mod posts;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Create the auth page routes router.
pub fn auth_routes(credential_limiter: &RateLimiterLayer) -> Router<AppState> {
    Router::new()
        .route(
            "/sign-in",
            get(auth::sign_in_page).merge(post(auth::sign_in).layer(credential_limiter.clone())),
        )
        .route(
            "/sign-up",
            get(auth::sign_up_page).merge(post(auth::sign_up).layer(credential_limiter.clone())),
        )
        .route("/sign-out", post(auth::sign_out))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    let credential_limiter = auth_rate_limiter();

    Router::new()
        .route("/", get(home::index))
        .route("/posts/{slug}", get(posts::show))
        .route("/about", get(pages::about))
        .route(
            "/newsletter",
            get(newsletter::page).post(newsletter::subscribe),
        )
        .nest("/auth", auth_routes(&credential_limiter))
        .nest("/api", api::routes(&credential_limiter))
        .fallback(pages::not_found)
}
