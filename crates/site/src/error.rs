//! Unified error handling with Sentry integration.
//!
//! JSON endpoints return `ApiError`, rendered as `{"ok": false, "error": <code>}`.
//! Page handlers return `PageError`, rendered as an HTML error page. Both
//! capture server errors to Sentry before responding and never expose
//! internal detail to the client.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use lantern_core::CommentBodyError;

use crate::db::RepositoryError;
use crate::filters;
use crate::models::CurrentUser;
use crate::services::{AuthError, NewsletterError};

/// Error type for JSON API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input.
    #[error("invalid input")]
    Invalid,

    /// Input exceeds a length limit.
    #[error("input too long")]
    TooLong,

    /// Resource already exists.
    #[error("already exists")]
    Exists,

    /// Caller is not signed in.
    #[error("unauthorized")]
    Unauthorized,

    /// Email/password did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable code sent to clients.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::TooLong => "too_long",
            Self::Exists => "exists",
            Self::Unauthorized => "unauthorized",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => "server",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Invalid | Self::TooLong => StatusCode::BAD_REQUEST,
            Self::Exists => StatusCode::CONFLICT,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (
            status,
            Json(serde_json::json!({ "ok": false, "error": self.code() })),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(_) | AuthError::InvalidName(_) | AuthError::WeakPassword(_) => {
                Self::Invalid
            }
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::UserAlreadyExists => Self::Exists,
            AuthError::Repository(e) => Self::Database(e),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
        }
    }
}

impl From<NewsletterError> for ApiError {
    fn from(err: NewsletterError) -> Self {
        match err {
            NewsletterError::InvalidEmail => Self::Invalid,
            NewsletterError::AlreadySubscribed => Self::Exists,
            NewsletterError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<CommentBodyError> for ApiError {
    fn from(err: CommentBodyError) -> Self {
        match err {
            CommentBodyError::Empty => Self::Invalid,
            CommentBodyError::TooLong { .. } => Self::TooLong,
        }
    }
}

/// Result type alias for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// JSON body extractor whose rejection is `ApiError::Invalid`.
///
/// Malformed bodies, a wrong content type, and missing fields all come back
/// as `{"ok": false, "error": "invalid"}` instead of axum's plain-text rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                log_rejection(&rejection);
                Err(ApiError::Invalid)
            }
        }
    }
}

fn log_rejection(rejection: &JsonRejection) {
    tracing::debug!(reason = %rejection.body_text(), "Rejected JSON body");
}

// =============================================================================
// Page errors
// =============================================================================

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub title: &'static str,
    pub message: &'static str,
    pub current_user: Option<CurrentUser>,
}

/// Error type for HTML page handlers.
#[derive(Debug, Error)]
pub enum PageError {
    /// Page or post not found.
    #[error("Not found")]
    NotFound,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "We couldn't find the page you were looking for.",
            ),
            Self::Database(_) | Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Page error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong",
                    "Please try again in a moment.",
                )
            }
        };

        let page = ErrorTemplate {
            status: status.as_u16(),
            title,
            message,
            current_user: None,
        };

        (status, page).into_response()
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
