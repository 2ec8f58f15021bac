//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::content::Post;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub posts: &'a [Post],
    pub current_user: Option<CurrentUser>,
}

/// Display the post listing, newest first.
#[instrument(skip(state, user))]
pub async fn index(State(state): State<AppState>, OptionalUser(user): OptionalUser) -> Response {
    HomeTemplate {
        posts: state.content().posts(),
        current_user: user,
    }
    .into_response()
}
