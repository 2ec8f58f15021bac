//! Static page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Response};

use crate::error::PageError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub current_user: Option<CurrentUser>,
}

/// Display the about page.
pub async fn about(OptionalUser(user): OptionalUser) -> AboutTemplate {
    AboutTemplate { current_user: user }
}

/// Fallback for unknown paths.
pub async fn not_found() -> Response {
    PageError::NotFound.into_response()
}
