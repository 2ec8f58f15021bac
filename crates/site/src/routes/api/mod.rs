//! JSON API handlers.
//!
//! Every response body is an object with an `ok` flag. Successful responses
//! flatten their payload next to it; failures carry an `error` code (see
//! [`crate::error::ApiError`]).

pub mod auth;
pub mod newsletter;
pub mod posts;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::middleware::api_rate_limiter;
use crate::middleware::rate_limit::RateLimiterLayer;
use crate::state::AppState;

/// Successful API response body: `{"ok": true, ...payload}`.
#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    ok: bool,
    #[serde(flatten)]
    payload: T,
}

impl<T: Serialize> ApiOk<T> {
    /// Wrap a payload.
    #[must_use]
    pub const fn new(payload: T) -> Self {
        Self { ok: true, payload }
    }
}

/// Payload for responses that carry nothing beyond `ok`.
#[derive(Debug, Serialize)]
pub struct Empty {}

/// `{"ok": true}`.
#[must_use]
pub const fn ok() -> ApiOk<Empty> {
    ApiOk::new(Empty {})
}

/// Create the `/api` router.
///
/// `credential_limiter` is shared with the HTML sign-in/sign-up forms so both
/// surfaces draw from the same per-IP budget.
pub fn routes(credential_limiter: &RateLimiterLayer) -> Router<AppState> {
    let auth = Router::new()
        .route(
            "/sign-up",
            post(auth::sign_up).layer(credential_limiter.clone()),
        )
        .route(
            "/sign-in",
            post(auth::sign_in).layer(credential_limiter.clone()),
        )
        .route("/sign-out", post(auth::sign_out))
        .route("/session", get(auth::session));

    let posts = Router::new()
        .route("/{slug}/view", get(posts::get_view).post(posts::record_view))
        .route("/{slug}/likes", get(posts::get_likes).post(posts::toggle_like))
        .route(
            "/{slug}/comments",
            get(posts::list_comments).post(posts::create_comment),
        );

    Router::new()
        .nest("/auth", auth)
        .route(
            "/newsletter",
            post(newsletter::subscribe).layer(api_rate_limiter()),
        )
        .nest("/posts", posts)
}
