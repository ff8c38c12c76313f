use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use briefcase_llm::Message;

use crate::{
    error::{ApiError, ApiResult},
    handlers::completion::complete,
    prompts::SUMMARY_PROMPT,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SummarizeRequest {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Summarize a legal text
#[utoipa::path(
    post,
    path = "/api/summarize",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary", body = SummarizeResponse),
        (status = 400, description = "Empty text")
    ),
    tag = "documents"
)]
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SummarizeRequest>,
) -> ApiResult<Json<SummarizeResponse>> {
    if req.text.trim().is_empty() {
        return Err(ApiError::Validation("text must not be empty".to_string()));
    }

    let messages = vec![Message::system(SUMMARY_PROMPT), Message::human(req.text)];
    let response = complete(&state, "summarize", messages, state.chat_options(None)).await?;

    let summary = response
        .content
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Upstream("model returned an empty summary".to_string()))?;

    Ok(Json(SummarizeResponse { summary }))
}
