//! Sign-in, sign-up and sign-out pages.
//!
//! These are the no-JavaScript counterparts of `/api/auth/*`. Failures
//! redirect back to the form with an `?error=` code.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{ApiError, PageError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Sign-in form data.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Sign-up form data.
#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    #[serde(default, rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the sign-in page.
#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    pub error: Option<String>,
    #[serde(rename = "signedUp")]
    pub signed_up: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Query parameters for the sign-up page.
#[derive(Debug, Default, Deserialize)]
pub struct SignUpQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Sign-in page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_in.html")]
pub struct SignInTemplate {
    pub error: Option<&'static str>,
    pub signed_up: bool,
    pub email: String,
    pub callback_url: String,
    pub current_user: Option<CurrentUser>,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_up.html")]
pub struct SignUpTemplate {
    pub error: Option<&'static str>,
    pub current_user: Option<CurrentUser>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the sign-in page.
pub async fn sign_in_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<SignInQuery>,
) -> SignInTemplate {
    SignInTemplate {
        error: query
            .error
            .as_ref()
            .map(|_| "Sign in failed. Check your email and password."),
        signed_up: query.signed_up.is_some(),
        email: query.email.unwrap_or_default(),
        callback_url: safe_callback_url(query.callback_url.as_deref()).to_owned(),
        current_user: user,
    }
}

/// Handle the sign-in form.
#[instrument(skip(state, session, form))]
pub async fn sign_in(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignInForm>,
) -> Result<Redirect, PageError> {
    let callback_url = safe_callback_url(form.callback_url.as_deref());

    let result = if form.email.trim().is_empty() || form.password.is_empty() {
        Err(AuthError::InvalidCredentials)
    } else {
        AuthService::new(state.pool())
            .login_with_password(&form.email, &form.password)
            .await
    };

    let user = match result {
        Ok(user) => CurrentUser::from(user),
        Err(e) => {
            let code = error_code(e);
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("error", code)
                .append_pair("email", form.email.trim())
                .append_pair("callbackUrl", callback_url)
                .finish();
            return Ok(Redirect::to(&format!("/auth/sign-in?{query}")));
        }
    };

    set_current_user(&session, &user)
        .await
        .map_err(|e| PageError::Internal(format!("failed to store session: {e}")))?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    tracing::info!(user_id = %user.id, "User signed in");

    Ok(Redirect::to(callback_url))
}

/// Display the sign-up page.
pub async fn sign_up_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<SignUpQuery>,
) -> SignUpTemplate {
    let error = query.error.as_deref().map(|code| match code {
        "exists" => "An account with that email already exists.",
        "invalid" => {
            "Please provide a display name, valid email, and a password of at least 8 characters."
        }
        _ => "Sign up failed. Check your details and try again.",
    });

    SignUpTemplate {
        error,
        current_user: user,
    }
}

/// Handle the sign-up form, then send the reader to sign in.
#[instrument(skip(state, form))]
pub async fn sign_up(State(state): State<AppState>, Form(form): Form<SignUpForm>) -> Redirect {
    match AuthService::new(state.pool())
        .register_with_password(&form.display_name, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("signedUp", "1")
                .append_pair("email", user.email.as_str())
                .finish();
            Redirect::to(&format!("/auth/sign-in?{query}"))
        }
        Err(e) => Redirect::to(&format!("/auth/sign-up?error={}", error_code(e))),
    }
}

/// Sign out and return home.
#[instrument(skip(session))]
pub async fn sign_out(session: Session) -> Result<Redirect, PageError> {
    clear_current_user(&session)
        .await
        .map_err(|e| PageError::Internal(format!("failed to clear session: {e}")))?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}

// =============================================================================
// Helpers
// =============================================================================

/// Map an auth failure to the same code the JSON API would return, logging
/// server-side failures.
fn error_code(err: AuthError) -> &'static str {
    let api_error = ApiError::from(err);
    if api_error.status().is_server_error() {
        tracing::error!(error = %api_error, "Auth form failed");
    }
    api_error.code()
}

/// Only same-site absolute paths are allowed as post-login destinations.
fn safe_callback_url(candidate: Option<&str>) -> &str {
    match candidate {
        Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.contains('\\') => url,
        _ => "/",
    }
}
