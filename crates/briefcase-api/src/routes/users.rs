use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use briefcase_persist::{UserData, UserDataUpdate};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Stored profile and subscription flag for a user
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User data"),
        (status = 404, description = "Unknown user")
    ),
    tag = "cache"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserData>> {
    state
        .users
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", id)))
}

/// Apply a partial update; omitted fields are kept
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Updated user data")),
    tag = "cache"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<UserDataUpdate>,
) -> ApiResult<Json<UserData>> {
    Ok(Json(state.users.update(&id, update).await?))
}
