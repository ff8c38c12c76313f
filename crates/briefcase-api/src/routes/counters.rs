use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;

use briefcase_persist::Counter;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct IncrementRequest {
    /// Amount to add; defaults to 1
    #[serde(default)]
    pub by: Option<i64>,
}

/// Current value of a counter (0 when never incremented)
#[utoipa::path(
    get,
    path = "/api/counters/{id}",
    params(("id" = String, Path, description = "Counter ID")),
    responses((status = 200, description = "Counter value")),
    tag = "cache"
)]
pub async fn get_counter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Counter>> {
    Ok(Json(state.counters.get(&id).await?))
}

/// Increment a counter and invalidate its cached value
#[utoipa::path(
    post,
    path = "/api/counters/{id}/increment",
    params(("id" = String, Path, description = "Counter ID")),
    request_body = IncrementRequest,
    responses(
        (status = 200, description = "Counter after the increment"),
        (status = 400, description = "Invalid amount")
    ),
    tag = "cache"
)]
pub async fn increment_counter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<IncrementRequest>>,
) -> ApiResult<Json<Counter>> {
    let by = body.and_then(|Json(req)| req.by).unwrap_or(1);
    if by == 0 {
        return Err(ApiError::Validation("by must not be zero".to_string()));
    }

    Ok(Json(state.counters.increment(&id, by).await?))
}
