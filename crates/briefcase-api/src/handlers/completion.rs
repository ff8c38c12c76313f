use chrono::Utc;
use serde_json::json;

use briefcase_llm::{ChatOptions, ChatRequest, ChatResponse, Message};
use briefcase_observability::{GenerationObservation, TraceContext};

use crate::{error::ApiResult, state::AppState};

/// Non-streaming completion for the side tasks (fees, titles, summaries,
/// prospects), traced under `name`.
pub async fn complete(
    state: &AppState,
    name: &'static str,
    messages: Vec<Message>,
    options: ChatOptions,
) -> ApiResult<ChatResponse> {
    let model = state.config.llm.utility_model().to_string();
    let input = serde_json::to_value(&messages).unwrap_or_default();

    let trace = TraceContext::new(name, input.clone());
    let trace_id = trace.trace_id.clone();
    let observer = state.observer.clone();
    state.observe("trace", async move { observer.trace_start(trace).await });

    let started_at = Utc::now();
    let request = ChatRequest::new(model.clone(), messages).with_options(options);
    let result = state.llm_client.chat(request).await;

    let (output, usage, error) = match &result {
        Ok(response) => (response.content.clone(), response.usage.clone(), None),
        Err(e) => (None, None, Some(format!("{:#}", e))),
    };
    let generation = GenerationObservation {
        trace_id,
        name: name.to_string(),
        model,
        input,
        output,
        started_at,
        ended_at: Utc::now(),
        usage,
        error,
    };
    let observer = state.observer.clone();
    state.observe("generation", async move { observer.trace_generation(generation).await });

    let response = result?;
    tracing::debug!(task = name, finish_reason = ?response.finish_reason, "Completion finished");
    Ok(response)
}

/// Like [`complete`] with a JSON-object reply parsed into `T`
pub async fn complete_json<T: serde::de::DeserializeOwned>(
    state: &AppState,
    name: &'static str,
    messages: Vec<Message>,
) -> ApiResult<T> {
    let options = state.chat_options(None).json();
    let response = complete(state, name, messages, options).await?;
    response.json().map_err(|e| {
        tracing::warn!(task = name, raw = %json!(response.content), "Unparseable completion");
        e.into()
    })
}
