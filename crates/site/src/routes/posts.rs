//! Post page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::content::Post;
use crate::db::{CommentRepository, LikeRepository, PostRepository};
use crate::error::PageError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::models::{Comment, CurrentUser, LikeState};
use crate::state::AppState;

/// Post page template.
#[derive(Template, WebTemplate)]
#[template(path = "posts/show.html")]
pub struct PostTemplate<'a> {
    pub post: &'a Post,
    pub view_count: i64,
    pub likes: LikeState,
    pub comments: Vec<Comment>,
    pub current_user: Option<CurrentUser>,
}

/// Display a post with its engagement widgets.
///
/// Counts and comments are rendered server-side; `engagement.js` records the
/// view and handles likes and new comments from there.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    OptionalUser(user): OptionalUser,
) -> Result<Response, PageError> {
    let post = state.content().get_post(&slug).ok_or(PageError::NotFound)?;

    let pool = state.pool();
    let post_repo = PostRepository::new(pool);
    let like_repo = LikeRepository::new(pool);
    let comment_repo = CommentRepository::new(pool);

    let (view_count, likes, comments) = tokio::try_join!(
        post_repo.view_count(&slug),
        like_repo.state(&slug, user.as_ref().map(|u| u.id)),
        comment_repo.list_for_slug(&slug),
    )?;

    Ok(PostTemplate {
        post,
        view_count,
        likes,
        comments,
        current_user: user,
    }
    .into_response())
}
