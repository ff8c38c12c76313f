use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use briefcase_llm::Message;
use briefcase_types::FeeResult;

use crate::{
    error::{ApiError, ApiResult},
    handlers::completion::complete_json,
    prompts::FEE_PROMPT,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeeRequest {
    /// Conversation or document text the question refers to
    #[serde(default)]
    pub context: String,
    pub question: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeeResponse {
    pub hours: f64,
    pub rationale: String,
}

/// Estimate the lawyer hours a question would take
#[utoipa::path(
    post,
    path = "/api/calculate-fee",
    request_body = FeeRequest,
    responses(
        (status = 200, description = "Estimated hours with rationale", body = FeeResponse),
        (status = 400, description = "Empty question"),
        (status = 500, description = "Model call failed or returned an invalid estimate")
    ),
    tag = "fees"
)]
pub async fn calculate_fee(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeeRequest>,
) -> ApiResult<Json<FeeResponse>> {
    if req.question.trim().is_empty() {
        return Err(ApiError::Validation("question must not be empty".to_string()));
    }

    let messages = vec![
        Message::system(FEE_PROMPT),
        Message::human(format!(
            "Context:\n{}\n\nQuestion:\n{}",
            req.context, req.question
        )),
    ];

    let result: FeeResult = complete_json(&state, "fee-estimate", messages).await?;
    let result = validate(result)?;

    Ok(Json(FeeResponse {
        hours: result.hours,
        rationale: result.rationale,
    }))
}

fn validate(result: FeeResult) -> ApiResult<FeeResult> {
    if !result.hours.is_finite() || result.hours < 0.0 {
        return Err(ApiError::Upstream(format!(
            "model returned an invalid estimate: {} hours",
            result.hours
        )));
    }
    Ok(result)
}
