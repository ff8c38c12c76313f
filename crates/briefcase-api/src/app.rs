use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::{
        predicate::{DefaultPredicate, NotForContentType, Predicate},
        CompressionLayer,
    },
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    config::Config,
    docs,
    handlers::chat,
    middleware::logging,
    routes::{
        conversations, counters, documents, fee, feedback, health, prospects, subscription,
        summarize, titles, users,
    },
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Assistant
        .route("/chat", post(chat::chat))
        .route("/feedback", post(feedback::submit_feedback))
        .route("/calculate-fee", post(fee::calculate_fee))
        .route("/generate-title", post(titles::generate_title))
        .route("/summarize", post(summarize::summarize))
        .route("/prospects", post(prospects::find_prospects))
        // Documents
        .route(
            "/documents",
            post(documents::upload_document)
                .layer(DefaultBodyLimit::max(state.config.server.max_upload_bytes)),
        )
        // Conversations
        .route("/conversations", get(conversations::list_conversations))
        .route(
            "/conversations/:id",
            get(conversations::get_conversation)
                .put(conversations::put_conversation)
                .delete(conversations::delete_conversation),
        )
        // Cached state
        .route("/counters/:id", get(counters::get_counter))
        .route("/counters/:id/increment", post(counters::increment_counter))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        // Billing
        .route("/subscription/checkout", post(subscription::create_checkout))
        .route("/subscription/status", get(subscription::subscription_status))
        .route("/subscription/cancel", post(subscription::cancel_subscription));

    // Streamed chat answers must reach the client chunk by chunk
    let compression = CompressionLayer::new()
        .compress_when(DefaultPredicate::new().and(NotForContentType::const_new("text/plain")));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_secs,
        )))
        .layer(compression)
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::permissive();
    }

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([axum::http::HeaderName::from_static(chat::TRACE_ID_HEADER)]);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
