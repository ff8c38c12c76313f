use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use briefcase_llm::Message;

use crate::{
    error::{ApiError, ApiResult},
    handlers::completion::complete_json,
    prompts::PROSPECT_PROMPT,
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProspectsRequest {
    /// Page to read (portfolio list, directory, event attendees, ...)
    pub url: String,
    /// What makes a good prospect, in the user's words
    #[serde(default)]
    pub criteria: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Prospect {
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProspectsResponse {
    pub prospects: Vec<Prospect>,
}

/// Extract potential clients from a web page
#[utoipa::path(
    post,
    path = "/api/prospects",
    request_body = ProspectsRequest,
    responses(
        (status = 200, description = "Prospects found on the page", body = ProspectsResponse),
        (status = 400, description = "Missing URL"),
        (status = 500, description = "Page fetch or model call failed")
    ),
    tag = "prospects"
)]
pub async fn find_prospects(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProspectsRequest>,
) -> ApiResult<Json<ProspectsResponse>> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(ApiError::Validation("url must not be empty".to_string()));
    }

    let page = state.scraper.fetch_text(url).await?;
    if page.is_empty() {
        return Ok(Json(ProspectsResponse { prospects: Vec::new() }));
    }

    let criteria = req
        .criteria
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or("early-stage startups that may need legal help");

    let messages = vec![
        Message::system(PROSPECT_PROMPT),
        Message::human(format!(
            "Criteria: {}\nSource: {}\n\nPage text:\n{}",
            criteria, url, page
        )),
    ];

    let mut found: ProspectsResponse = complete_json(&state, "prospects", messages).await?;
    found.prospects.retain(|p| !p.name.trim().is_empty());
    tracing::info!(url, count = found.prospects.len(), "Prospects extracted");

    Ok(Json(found))
}
