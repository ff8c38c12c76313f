use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    handlers::completion::complete,
    prompts::{clean_title, title_request},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TitleRequest {
    pub user_message: String,
    #[serde(default)]
    pub assistant_message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TitleResponse {
    pub title: String,
}

/// Name a conversation from its first exchange
#[utoipa::path(
    post,
    path = "/api/generate-title",
    request_body = TitleRequest,
    responses(
        (status = 200, description = "Generated title", body = TitleResponse),
        (status = 400, description = "Empty user message")
    ),
    tag = "conversations"
)]
pub async fn generate_title(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TitleRequest>,
) -> ApiResult<Json<TitleResponse>> {
    if req.user_message.trim().is_empty() {
        return Err(ApiError::Validation("userMessage must not be empty".to_string()));
    }

    let options = state.chat_options(None).max_tokens(20);
    let response = complete(
        &state,
        "title",
        title_request(&req.user_message, &req.assistant_message),
        options,
    )
    .await?;

    Ok(Json(TitleResponse {
        title: clean_title(response.content.as_deref().unwrap_or_default()),
    }))
}
