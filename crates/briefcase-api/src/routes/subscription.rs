use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use briefcase_billing::SubscriptionStatus;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub session_id: String,
    /// When given, the session must belong to this user and the verified
    /// status is stored on the user's record
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_subscribed: bool,
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
}

impl From<SubscriptionStatus> for StatusResponse {
    fn from(status: SubscriptionStatus) -> Self {
        Self {
            is_subscribed: status.is_subscribed,
            session_id: status.session_id,
            subscription_id: status.subscription_id,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub session_id: String,
    pub user_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    pub canceled: bool,
}

/// Start a hosted subscription checkout
#[utoipa::path(
    post,
    path = "/api/subscription/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutResponse),
        (status = 400, description = "Missing user id"),
        (status = 500, description = "Billing not configured or processor error")
    ),
    tag = "subscription"
)]
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<Json<CheckoutResponse>> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::Validation("userId must not be empty".to_string()));
    }

    let session = state.billing()?.create_checkout(&req.user_id, req.email).await?;

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// Verify a checkout session with the processor
#[utoipa::path(
    get,
    path = "/api/subscription/status",
    params(StatusQuery),
    responses(
        (status = 200, description = "Verified status", body = StatusResponse),
        (status = 400, description = "Malformed session id"),
        (status = 403, description = "Session belongs to another user")
    ),
    tag = "subscription"
)]
pub async fn subscription_status(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<StatusResponse>> {
    let billing = state.billing()?;

    let status = match query.user_id.as_deref().filter(|u| !u.is_empty()) {
        Some(user_id) => {
            let status = billing.verify_for(&query.session_id, user_id).await?;
            state
                .users
                .set_subscription(user_id, status.is_subscribed, status.session_id.clone())
                .await?;
            status
        }
        None => billing.verify(&query.session_id).await?,
    };

    Ok(Json(status.into()))
}

/// Cancel the subscription bought through a session owned by the caller
#[utoipa::path(
    post,
    path = "/api/subscription/cancel",
    request_body = CancelRequest,
    responses(
        (status = 200, description = "Subscription canceled", body = CancelResponse),
        (status = 400, description = "Session has no subscription"),
        (status = 403, description = "Session belongs to another user")
    ),
    tag = "subscription"
)]
pub async fn cancel_subscription(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CancelRequest>,
) -> ApiResult<Json<CancelResponse>> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::Validation("userId must not be empty".to_string()));
    }

    state.billing()?.cancel(&req.session_id, &req.user_id).await?;
    state
        .users
        .set_subscription(&req.user_id, false, None)
        .await?;

    Ok(Json(CancelResponse { canceled: true }))
}
