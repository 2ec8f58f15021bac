//! Newsletter signup API.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::instrument;

use super::{ApiOk, Empty, ok};
use crate::error::{ApiJson, ApiResult};
use crate::services::NewsletterService;
use crate::state::AppState;

/// Newsletter request body.
#[derive(Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
}

/// Subscribe an email address.
///
/// `201 {"ok": true}`; `400 invalid` for a malformed address; `409 exists`
/// if already subscribed.
#[instrument(skip(state, body))]
pub async fn subscribe(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubscribeRequest>,
) -> ApiResult<(StatusCode, Json<ApiOk<Empty>>)> {
    NewsletterService::new(state.pool(), state.newsletter_webhook())
        .subscribe(&body.email)
        .await?;

    Ok((StatusCode::CREATED, Json(ok())))
}
