use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use briefcase_observability::Feedback;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    /// Trace id from the `x-trace-id` header of the rated answer
    pub request_id: String,
    pub score: f64,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub status: String,
}

/// Attach a user rating to an earlier answer
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 202, description = "Feedback recorded", body = FeedbackResponse),
        (status = 400, description = "Missing request id or invalid score"),
        (status = 500, description = "Tracing service rejected the score")
    ),
    tag = "chat"
)]
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeedbackRequest>,
) -> ApiResult<(StatusCode, Json<FeedbackResponse>)> {
    if req.request_id.trim().is_empty() {
        return Err(ApiError::Validation("requestId must not be empty".to_string()));
    }
    if !req.score.is_finite() {
        return Err(ApiError::Validation("score must be a number".to_string()));
    }

    state
        .observer
        .score(Feedback {
            trace_id: req.request_id,
            score: req.score,
            comment: req.comment.filter(|c| !c.trim().is_empty()),
            user_id: req.user_id,
        })
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(FeedbackResponse {
            status: "accepted".to_string(),
        }),
    ))
}
