//! Account API: sign-up, sign-in, sign-out, and the current session.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use super::{ApiOk, Empty, ok};
use crate::error::{ApiError, ApiJson, ApiResult, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

/// Sign-up request body.
#[derive(Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sign-in request body.
#[derive(Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Payload carrying the signed-in user (or `null`).
#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub user: Option<CurrentUser>,
}

/// Create an account.
///
/// `201 {"ok": true}`; `400 invalid` for a blank name, malformed email, or a
/// password under 8 characters; `409 exists` if the email is taken.
#[instrument(skip(state, body))]
pub async fn sign_up(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ApiOk<Empty>>)> {
    AuthService::new(state.pool())
        .register_with_password(&body.name, &body.email, &body.password)
        .await?;

    Ok((StatusCode::CREATED, Json(ok())))
}

/// Verify credentials and start a session.
#[instrument(skip(state, session, body))]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<SignInRequest>,
) -> ApiResult<Json<ApiOk<UserPayload>>> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::Invalid);
    }

    let user = AuthService::new(state.pool())
        .login_with_password(&body.email, &body.password)
        .await?;

    let current_user = CurrentUser::from(user);
    set_current_user(&session, &current_user).await?;
    set_sentry_user(&current_user.id, Some(current_user.email.as_str()));

    tracing::info!(user_id = %current_user.id, "User signed in");

    Ok(Json(ApiOk::new(UserPayload {
        user: Some(current_user),
    })))
}

/// End the session.
#[instrument(skip(session))]
pub async fn sign_out(session: Session) -> ApiResult<Json<ApiOk<Empty>>> {
    clear_current_user(&session).await?;
    clear_sentry_user();

    Ok(Json(ok()))
}

/// The signed-in user, or `null`.
pub async fn session(OptionalUser(user): OptionalUser) -> Json<ApiOk<UserPayload>> {
    Json(ApiOk::new(UserPayload { user }))
}
