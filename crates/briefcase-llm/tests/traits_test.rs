use briefcase_llm::{ChatClient, ChatOptions, ChatRequest, Message, OpenAIClient, OpenAIConfig, ResponseFormat, text_deltas};
use futures::StreamExt;

#[test]
fn test_chat_request_with_options() {
    let messages = vec![Message::human("Hello")];
    let options = ChatOptions::new()
        .temperature(0.7)
        .max_tokens(100)
        .seed(7);

    let request = ChatRequest::new("gpt-4o", messages)
        .with_options(options);

    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_tokens, Some(100));
    assert_eq!(request.options.seed, Some(7));
    assert_eq!(request.options.response_format, ResponseFormat::Text);
}

#[test]
fn test_chat_options_default() {
    let options = ChatOptions::default();

    assert_eq!(options.temperature, None);
    assert_eq!(options.max_tokens, None);
    assert_eq!(options.seed, None);
}

fn client_for(server: &mockito::Server) -> OpenAIClient {
    let config = OpenAIConfig::new("sk-test").with_base_url(server.url());
    OpenAIClient::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_chat_against_mock_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "id": "chatcmpl-1",
                "model": "gpt-4o",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": "Incorporate in Delaware" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14 }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server);
    let response = client
        .chat(ChatRequest::new("gpt-4o", vec![Message::human("Where?")]))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.content.as_deref(), Some("Incorporate in Delaware"));
    assert_eq!(response.usage.unwrap().total_tokens, 14);
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
}

#[tokio::test]
async fn test_chat_stream_against_mock_server() {
    let mut server = mockito::Server::new_async().await;
    let body = [
        r#"data: {"id":"c","model":"m","choices":[{"index":0,"delta":{"role":"assistant","content":"Hi"},"finish_reason":null}]}"#,
        r#"data: {"id":"c","model":"m","choices":[{"index":0,"delta":{"content":" there"},"finish_reason":null}]}"#,
        r#"data: {"id":"c","model":"m","choices":[{"index":0,"delta":{},"finish_reason":"stop"}]}"#,
        "data: [DONE]",
        "",
    ]
    .join("\n\n");

    let _mock = server
        .mock("POST", "/chat/completions")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({ "stream": true, "seed": 3 })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(body)
        .create_async()
        .await;

    let client = client_for(&server);
    let request = ChatRequest::new("m", vec![Message::human("Hello")])
        .with_options(ChatOptions::new().seed(3));
    let stream = client.chat_stream(request).await.unwrap();
    let text: Vec<String> = text_deltas(stream).map(|t| t.unwrap()).collect().await;

    assert_eq!(text.concat(), "Hi there");
}

#[tokio::test]
async fn test_upstream_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":{"message":"bad key"}}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let err = client
        .chat_stream(ChatRequest::new("m", vec![Message::human("Hello")]))
        .await
        .err()
        .unwrap();

    assert!(err.to_string().contains("401"));
}
