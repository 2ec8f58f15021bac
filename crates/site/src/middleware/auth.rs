//! Authentication extractors.
//!
//! Provides extractors for requiring a signed-in reader in route handlers.
//! A session that cannot be read is a server error, not a signed-out reader.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::{ApiError, PageError};
use crate::models::{CurrentUser, session_keys};

/// Extractor that requires a signed-in user.
///
/// API requests (`/api/...`) are rejected with `401 {"ok":false,"error":"unauthorized"}`;
/// page requests are redirected to the sign-in page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

/// Error returned when authentication is required but nobody is signed in,
/// or the session could not be read.
pub enum AuthRejection {
    /// Redirect to sign-in page (for HTML requests).
    RedirectToSignIn,
    /// Unauthorized JSON response (for API requests).
    Unauthorized,
    /// Session read failed on an API request.
    Api(ApiError),
    /// Session read failed on a page request.
    Page(PageError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to("/auth/sign-in").into_response(),
            Self::Unauthorized => ApiError::Unauthorized.into_response(),
            Self::Api(err) => err.into_response(),
            Self::Page(err) => err.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers see a stripped URI; the original keeps the `/api` prefix.
        let is_api = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |OriginalUri(uri)| uri.path())
            .starts_with("/api/");
        let reject = || {
            if is_api {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToSignIn
            }
        };

        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or_else(reject)?;

        let user: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .map_err(|err| {
                if is_api {
                    AuthRejection::Api(ApiError::Session(err))
                } else {
                    let message = format!("session read failed: {err}");
                    AuthRejection::Page(PageError::Internal(message))
                }
            })?
            .ok_or_else(reject)?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireUser`, this does not reject the request if nobody is signed in.
pub struct OptionalUser(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Store the signed-in user in the session.
///
/// Cycles the session ID first so a pre-login session ID cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Sign out by discarding the whole session.
///
/// # Errors
///
/// Returns an error if the session store cannot delete the session.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
