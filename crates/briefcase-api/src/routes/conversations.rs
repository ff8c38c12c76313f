use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use briefcase_types::{group_conversations, Conversation, ConversationGroup};

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ListConversationsQuery {
    /// Client's UTC offset in minutes east of Greenwich; buckets follow the
    /// client's calendar days
    #[serde(default)]
    pub tz_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
}

impl From<&Conversation> for ConversationSummary {
    fn from(c: &Conversation) -> Self {
        Self {
            id: c.id.clone(),
            title: c.title.clone(),
            created_at: c.created_at,
            last_activity: c.last_activity(),
            message_count: c.messages().len(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupResponse {
    /// "Today", "Yesterday", "This Week", "This Month" or "Older"
    pub group: String,
    pub conversations: Vec<ConversationSummary>,
}

impl From<ConversationGroup<'_>> for GroupResponse {
    fn from(group: ConversationGroup<'_>) -> Self {
        Self {
            group: group.group.label().to_string(),
            conversations: group.conversations.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListConversationsResponse {
    pub groups: Vec<GroupResponse>,
}

/// List conversations grouped by last activity
#[utoipa::path(
    get,
    path = "/api/conversations",
    params(ListConversationsQuery),
    responses(
        (status = 200, description = "Grouped conversations", body = ListConversationsResponse),
        (status = 400, description = "Offset out of range")
    ),
    tag = "conversations"
)]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListConversationsQuery>,
) -> ApiResult<Json<ListConversationsResponse>> {
    let offset_minutes = query.tz_offset_minutes.unwrap_or(0);
    let offset = offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ApiError::Validation(format!("invalid tzOffsetMinutes: {}", offset_minutes)))?;

    let conversations = state.conversations.list().await?;
    let now = Utc::now().with_timezone(&offset);

    let groups = group_conversations(&conversations, &now)
        .into_iter()
        .map(GroupResponse::from)
        .collect();

    Ok(Json(ListConversationsResponse { groups }))
}

/// Get a conversation with its full transcript
#[utoipa::path(
    get,
    path = "/api/conversations/{id}",
    params(("id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation found"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Conversation>> {
    state
        .conversations
        .load(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Conversation not found: {}", id)))
}

/// Create or replace a conversation
#[utoipa::path(
    put,
    path = "/api/conversations/{id}",
    params(("id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation saved"),
        (status = 400, description = "Body id does not match the path")
    ),
    tag = "conversations"
)]
pub async fn put_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(conversation): Json<Conversation>,
) -> ApiResult<Json<Conversation>> {
    if conversation.id != id {
        return Err(ApiError::Validation(format!(
            "conversation id {} does not match path {}",
            conversation.id, id
        )));
    }

    state.conversations.save(&conversation).await?;
    tracing::debug!(conversation_id = %id, messages = conversation.messages().len(), "Conversation saved");
    Ok(Json(conversation))
}

/// Delete a conversation
#[utoipa::path(
    delete,
    path = "/api/conversations/{id}",
    params(("id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 204, description = "Conversation deleted"),
        (status = 404, description = "Conversation not found")
    ),
    tag = "conversations"
)]
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.conversations.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
