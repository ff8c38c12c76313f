use axum::Json;
use utoipa::OpenApi;

use crate::handlers::chat;
use crate::routes::{
    conversations, counters, documents, fee, feedback, health, prospects, subscription, summarize,
    titles, users,
};

#[derive(OpenApi)]
#[openapi(
    info(title = "Briefcase API", description = "Legal assistant for startup founders"),
    paths(
        health::health_check,
        chat::chat,
        feedback::submit_feedback,
        fee::calculate_fee,
        titles::generate_title,
        summarize::summarize,
        prospects::find_prospects,
        documents::upload_document,
        conversations::list_conversations,
        conversations::get_conversation,
        conversations::put_conversation,
        conversations::delete_conversation,
        counters::get_counter,
        counters::increment_counter,
        users::get_user,
        users::update_user,
        subscription::create_checkout,
        subscription::subscription_status,
        subscription::cancel_subscription,
    ),
    components(schemas(
        health::HealthResponse,
        chat::ChatRequestBody,
        feedback::FeedbackRequest,
        feedback::FeedbackResponse,
        fee::FeeRequest,
        fee::FeeResponse,
        titles::TitleRequest,
        titles::TitleResponse,
        summarize::SummarizeRequest,
        summarize::SummarizeResponse,
        prospects::ProspectsRequest,
        prospects::ProspectsResponse,
        prospects::Prospect,
        documents::DocumentUpload,
        conversations::ListConversationsResponse,
        conversations::GroupResponse,
        conversations::ConversationSummary,
        counters::IncrementRequest,
        subscription::CheckoutRequest,
        subscription::CheckoutResponse,
        subscription::StatusResponse,
        subscription::CancelRequest,
        subscription::CancelResponse,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "chat", description = "Streaming assistant and feedback"),
        (name = "fees", description = "Fee estimation"),
        (name = "documents", description = "Uploads and summaries"),
        (name = "prospects", description = "Prospect discovery"),
        (name = "conversations", description = "Conversation history"),
        (name = "cache", description = "Cached counters and user data"),
        (name = "subscription", description = "Billing"),
    )
)]
pub struct ApiDoc;

/// Serve the generated OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
