//! Post engagement API: views, likes, comments.
//!
//! Engagement rows are keyed by slug and created on first use, so these
//! endpoints do not consult the content store. Slugs are only checked for
//! shape.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lantern_core::CommentBody;

use super::ApiOk;
use crate::content::is_valid_slug;
use crate::db::{CommentRepository, LikeRepository, PostRepository, RepositoryError};
use crate::error::{ApiError, ApiJson, ApiResult};
use crate::middleware::{OptionalUser, RequireUser, ViewerCookie};
use crate::models::{Comment, LikeState, ViewOutcome};
use crate::state::AppState;

/// Comment request body.
#[derive(Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub body: Option<String>,
}

/// `{"comments": [...]}`
#[derive(Debug, Serialize)]
pub struct CommentsPayload {
    pub comments: Vec<Comment>,
}

/// `{"comment": {...}}`
#[derive(Debug, Serialize)]
pub struct CommentPayload {
    pub comment: Comment,
}

/// Accept exactly the slugs the content loader accepts.
///
/// # Errors
///
/// Returns `ApiError::Invalid` for anything else.
pub fn validate_slug(slug: &str) -> ApiResult<()> {
    if is_valid_slug(slug) {
        Ok(())
    } else {
        Err(ApiError::Invalid)
    }
}

// =============================================================================
// Views
// =============================================================================

/// Current view count without recording a view.
///
/// Issues the viewer cookie if missing so the follow-up POST is keyed
/// consistently.
#[instrument(skip(state, viewer))]
pub async fn get_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    viewer: ViewerCookie,
) -> ApiResult<Response> {
    validate_slug(&slug)?;

    let view_count = PostRepository::new(state.pool()).view_count(&slug).await?;

    let mut response = Json(ApiOk::new(ViewOutcome {
        view_count,
        incremented: false,
    }))
    .into_response();
    viewer.attach(&mut response, state.config().is_secure());

    Ok(response)
}

/// Record a view, de-duplicated per viewer key.
#[instrument(skip(state, viewer))]
pub async fn record_view(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    viewer: ViewerCookie,
) -> ApiResult<Response> {
    validate_slug(&slug)?;

    let outcome = PostRepository::new(state.pool())
        .record_view(&slug, viewer.key(), Utc::now(), state.view_policy())
        .await?;

    let mut response = Json(ApiOk::new(outcome)).into_response();
    viewer.attach(&mut response, state.config().is_secure());

    Ok(response)
}

// =============================================================================
// Likes
// =============================================================================

/// Like count and whether the caller liked the post.
#[instrument(skip(state, user))]
pub async fn get_likes(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    OptionalUser(user): OptionalUser,
) -> ApiResult<Json<ApiOk<LikeState>>> {
    validate_slug(&slug)?;

    let like_state = LikeRepository::new(state.pool())
        .state(&slug, user.map(|u| u.id))
        .await?;

    Ok(Json(ApiOk::new(like_state)))
}

/// Toggle the caller's like.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn toggle_like(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequireUser(user): RequireUser,
) -> ApiResult<Json<ApiOk<LikeState>>> {
    validate_slug(&slug)?;

    let like_state = LikeRepository::new(state.pool())
        .toggle(&slug, user.id)
        .await
        .map_err(stale_session)?;

    Ok(Json(ApiOk::new(like_state)))
}

// =============================================================================
// Comments
// =============================================================================

/// Comments on the post, newest first.
#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiOk<CommentsPayload>>> {
    validate_slug(&slug)?;

    let comments = CommentRepository::new(state.pool())
        .list_for_slug(&slug)
        .await?;

    Ok(Json(ApiOk::new(CommentsPayload { comments })))
}

/// Add a comment as the signed-in user.
#[instrument(skip(state, user, body), fields(user_id = %user.id))]
pub async fn create_comment(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequireUser(user): RequireUser,
    ApiJson(body): ApiJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<ApiOk<CommentPayload>>)> {
    validate_slug(&slug)?;

    let body = CommentBody::parse(body.body.as_deref().unwrap_or_default())?;

    let comment = CommentRepository::new(state.pool())
        .create(&slug, user.id, &body)
        .await
        .map_err(stale_session)?;

    tracing::info!(comment_id = %comment.id, "Comment created");

    Ok((
        StatusCode::CREATED,
        Json(ApiOk::new(CommentPayload { comment })),
    ))
}

/// A session whose user row is gone is treated as signed out.
fn stale_session(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => ApiError::Unauthorized,
        other => ApiError::Database(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::content::{ContentStore, MAX_SLUG_LENGTH};

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hello-world").is_ok());
        assert!(validate_slug("post_2026").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("../etc").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_loaded_slugs_pass_api_check() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("content/posts");
        let store = ContentStore::load(&dir).unwrap();

        assert!(!store.is_empty());
        for post in store.posts() {
            assert!(validate_slug(&post.meta.slug).is_ok(), "{}", post.meta.slug);
        }
    }
}
