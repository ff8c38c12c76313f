use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: HashMap<String, String>,
}

/// Health check endpoint
///
/// Reports which optional collaborators are configured
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let mut services = HashMap::new();

    services.insert("llm".to_string(), state.config.llm.model.clone());
    services.insert(
        "billing".to_string(),
        configured(state.billing.is_some()).to_string(),
    );
    services.insert(
        "tracing".to_string(),
        configured(state.config.langfuse_keys().is_some()).to_string(),
    );

    let listed = state.conversations.list().await.map(|c| c.len());
    services.insert(
        "storage".to_string(),
        match listed {
            Ok(_) => "available".to_string(),
            Err(e) => {
                tracing::warn!("Conversation store unavailable: {}", e);
                "unavailable".to_string()
            }
        },
    );

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        services,
    }))
}

fn configured(yes: bool) -> &'static str {
    if yes {
        "configured"
    } else {
        "disabled"
    }
}
