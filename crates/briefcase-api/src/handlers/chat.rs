use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use utoipa::ToSchema;

use briefcase_llm::{text_deltas, ChatRequest};
use briefcase_observability::{GenerationObservation, TraceContext};
use briefcase_types::ChatMessage;

use crate::{
    error::{ApiError, ApiResult},
    prompts::build_chat_prompt,
    state::AppState,
};

/// Response header carrying the id feedback must refer to
pub const TRACE_ID_HEADER: &str = "x-trace-id";

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    /// Transcript so far, oldest first
    #[schema(value_type = Vec<Object>)]
    pub messages: Vec<ChatMessage>,
    /// Text extracted from an uploaded document
    #[serde(default)]
    pub document_context: Option<String>,
    /// Caller's own OpenAI key, used instead of the server key
    #[serde(default)]
    pub user_api_key: Option<String>,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Stream the assistant's answer as plain text
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequestBody,
    responses(
        (status = 200, description = "Streaming answer; trace id in the x-trace-id header", body = String, content_type = "text/plain"),
        (status = 400, description = "Empty conversation"),
        (status = 500, description = "Model call failed")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequestBody>,
) -> ApiResult<Response> {
    if req.messages.is_empty() {
        return Err(ApiError::Validation("messages must not be empty".to_string()));
    }

    let client = state.chat_client(req.user_api_key.as_deref())?;
    let prompt = build_chat_prompt(&req.messages, req.document_context.as_deref());
    let model = state.config.llm.model.clone();
    let prompt_json = serde_json::to_value(&prompt).unwrap_or_default();
    let has_document = req
        .document_context
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());

    let trace = TraceContext::new("chat", json!({ "messages": req.messages }))
        .with_user(req.user_id.clone())
        .with_metadata("hasDocument", json!(has_document))
        .with_metadata("ownKey", json!(req.user_api_key.is_some()));
    let trace_id = trace.trace_id.clone();
    let trace_header =
        HeaderValue::from_str(&trace_id).map_err(|_| ApiError::Internal)?;

    let observer = state.observer.clone();
    state.observe("trace", async move { observer.trace_start(trace).await });

    let started_at = Utc::now();
    let generation = move |output: Option<String>, error: Option<String>| GenerationObservation {
        trace_id: trace_id.clone(),
        name: "chat-completion".to_string(),
        model: model.clone(),
        input: prompt_json.clone(),
        output,
        started_at,
        ended_at: Utc::now(),
        usage: None,
        error,
    };

    let request = ChatRequest::new(state.config.llm.model.clone(), prompt)
        .with_options(state.chat_options(req.seed));

    let events = match client.chat_stream(request).await {
        Ok(events) => events,
        Err(e) => {
            let message = format!("{:#}", e);
            let observer = state.observer.clone();
            let failed = generation(None, Some(message.clone()));
            state.observe("generation", async move { observer.trace_generation(failed).await });
            return Err(ApiError::Upstream(message));
        }
    };

    let finish_state = state.clone();
    let body = relay(text_deltas(events), move |transcript, error| {
        let observer = finish_state.observer.clone();
        let done = generation(Some(transcript), error);
        finish_state.observe("generation", async move { observer.trace_generation(done).await });
    });

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
        (header::CACHE_CONTROL, HeaderValue::from_static("no-cache, no-transform")),
        (HeaderName::from_static("x-accel-buffering"), HeaderValue::from_static("no")),
        (HeaderName::from_static(TRACE_ID_HEADER), trace_header),
    ];

    Ok((headers, Body::from_stream(body)).into_response())
}

/// Forward each delta as soon as it arrives and hand the full transcript
/// to `on_finish` once the upstream stream ends.
///
/// An upstream error ends the body with an I/O error so the client sees a
/// truncated response instead of a clean end of stream.
pub(crate) fn relay<S, F>(
    deltas: S,
    on_finish: F,
) -> impl Stream<Item = Result<String, std::io::Error>> + Send + 'static
where
    S: Stream<Item = anyhow::Result<String>> + Send + 'static,
    F: FnOnce(String, Option<String>) + Send + 'static,
{
    async_stream::stream! {
        let mut deltas = Box::pin(deltas);
        let mut transcript = String::new();
        let mut failure = None;

        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(text) => {
                    transcript.push_str(&text);
                    yield Ok(text);
                }
                Err(e) => {
                    tracing::error!("Chat stream failed mid-response: {:#}", e);
                    failure = Some(format!("{:#}", e));
                    break;
                }
            }
        }

        tracing::debug!(chars = transcript.len(), failed = failure.is_some(), "Chat stream finished");
        let error = failure.clone();
        on_finish(transcript, error);

        if let Some(message) = failure {
            yield Err(std::io::Error::other(message));
        }
    }
}
