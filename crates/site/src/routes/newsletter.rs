//! Newsletter page and form handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;
use crate::services::{NewsletterError, NewsletterService};
use crate::state::AppState;

/// Newsletter form data.
#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub email: String,
}

/// Query parameters carrying the outcome of the last submission.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

/// Newsletter page template.
#[derive(Template, WebTemplate)]
#[template(path = "newsletter.html")]
pub struct NewsletterTemplate {
    pub message: Option<&'static str>,
    pub is_error: bool,
    pub current_user: Option<CurrentUser>,
}

/// Display the newsletter signup page.
pub async fn page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<StatusQuery>,
) -> NewsletterTemplate {
    let (message, is_error) = match query.status.as_deref() {
        Some("subscribed") => (Some("You’re subscribed. Thanks for signing up!"), false),
        Some("exists") => (Some("You’re already subscribed."), false),
        Some("invalid") => (Some("Please enter a valid email."), true),
        Some(_) => (Some("Something went wrong."), true),
        None => (None, false),
    };

    NewsletterTemplate {
        message,
        is_error,
        current_user: user,
    }
}

/// Handle the no-JavaScript newsletter form.
#[instrument(skip(state, form))]
pub async fn subscribe(State(state): State<AppState>, Form(form): Form<SubscribeForm>) -> Redirect {
    let status = match NewsletterService::new(state.pool(), state.newsletter_webhook())
        .subscribe(&form.email)
        .await
    {
        Ok(_) => "subscribed",
        Err(NewsletterError::AlreadySubscribed) => "exists",
        Err(NewsletterError::InvalidEmail) => "invalid",
        Err(e) => {
            tracing::error!(error = %e, "Newsletter subscription failed");
            "error"
        }
    };

    Redirect::to(&format!("/newsletter?status={status}"))
}
