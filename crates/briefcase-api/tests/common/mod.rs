#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use briefcase_api::{build_router, AppState, Config};

/// Test configuration with every upstream pointed at `upstream`
pub fn test_config(upstream: &str) -> Config {
    let toml = format!(
        r#"
        [server]
        host = "127.0.0.1"
        port = 0

        [cors]
        enabled = true
        origins = ["*"]

        [llm]
        model = "gpt-4o-mini"
        temperature = 0.2
        seed = 42
        base_url = "{upstream}"

        [billing]
        base_url = "{upstream}"
        price_id = "price_test"
        success_url = "http://localhost:3000/ok?session_id={{CHECKOUT_SESSION_ID}}"
        cancel_url = "http://localhost:3000/cancel"

        [tracing]
        enabled = true
        host = "{upstream}"

        [storage]
        backend = "memory"

        [prospects]
        max_page_chars = 2000
        fetch_timeout_secs = 5
        allow_private_hosts = true

        [logging]
        level = "debug"
        format = "pretty"
        "#
    );

    let mut config: Config = toml::from_str(&toml).unwrap();
    config.openai_api_key = "sk-server".to_string();
    config
}

pub async fn app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_config(config).await.unwrap());
    (build_router(state.clone()), state)
}

/// Router with the LLM pointed at `upstream`, no billing and no tracing
pub async fn app(upstream: &str) -> Router {
    app_with(test_config(upstream)).await.0
}

/// Router with billing (and the payment processor) at `upstream`
pub async fn billing_app(upstream: &str) -> Router {
    let mut config = test_config(upstream);
    config.stripe_secret_key = Some("sk_test_123".to_string());
    app_with(config).await.0
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Non-streaming chat completion reply carrying `content`
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 12, "completion_tokens": 8, "total_tokens": 20 }
    })
    .to_string()
}

/// SSE body streaming `deltas` then `[DONE]`
pub fn sse_body(deltas: &[&str]) -> String {
    let mut body = String::new();
    for delta in deltas {
        let chunk = serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{ "index": 0, "delta": { "content": delta }, "finish_reason": null }]
        });
        body.push_str(&format!("data: {}\n\n", chunk));
    }
    body.push_str("data: [DONE]\n\n");
    body
}
