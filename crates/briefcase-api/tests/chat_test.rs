mod common;

use axum::http::StatusCode;
use mockito::Matcher;
use serde_json::json;

use common::{app, body_json, body_text, json_request, send, sse_body};

#[tokio::test]
async fn test_chat_streams_plain_text_with_trace_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-server")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({ "model": "gpt-4o-mini", "stream": true, "seed": 42 })),
            Matcher::Regex(r"Context from the uploaded document:\\n\\nMutual NDA".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(sse_body(&["Hello", " founder", "!"]))
        .create_async()
        .await;

    let app = app(&server.url()).await;
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/chat",
            json!({
                "messages": [{ "role": "user", "content": "Is this NDA mutual?" }],
                "documentContext": "Mutual NDA between Acme and Beta"
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; charset=utf-8"
    );
    let trace_id = response.headers()["x-trace-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&trace_id).is_ok());

    assert_eq!(body_text(response).await, "Hello founder!");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_request_seed_overrides_default() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "seed": 7 })))
        .with_status(200)
        .with_body(sse_body(&["ok"]))
        .create_async()
        .await;

    let app = app(&server.url()).await;
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/chat",
            json!({ "messages": [{ "role": "user", "content": "hi" }], "seed": 7 }),
        ),
    )
    .await;

    assert_eq!(body_text(response).await, "ok");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_uses_caller_api_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-user-own")
        .with_status(200)
        .with_body(sse_body(&["answer"]))
        .create_async()
        .await;

    let app = app(&server.url()).await;
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/chat",
            json!({
                "messages": [{ "role": "user", "content": "hi" }],
                "userApiKey": "sk-user-own"
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "answer");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_rejects_empty_messages() {
    let server = mockito::Server::new_async().await;
    let app = app(&server.url()).await;

    let response = send(&app, json_request("POST", "/api/chat", json!({ "messages": [] }))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("messages"));
}

#[tokio::test]
async fn test_chat_upstream_failure_is_json_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let app = app(&server.url()).await;
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/chat",
            json!({ "messages": [{ "role": "user", "content": "hi" }] }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Incorrect API key provided"));
}
