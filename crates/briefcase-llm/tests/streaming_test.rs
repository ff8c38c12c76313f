use briefcase_llm::{parse_chat_sse_stream, text_deltas, StreamEvent};
use futures::{stream, StreamExt};

fn chunk(content: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{ "index": 0, "delta": { "content": content }, "finish_reason": null }]
        })
    )
}

fn finish_chunk() -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o",
            "choices": [{ "index": 0, "delta": {}, "finish_reason": "stop" }]
        })
    )
}

fn byte_stream(parts: Vec<String>) -> impl futures::Stream<Item = Result<Vec<u8>, std::io::Error>> {
    stream::iter(parts.into_iter().map(|p| Ok(p.into_bytes())))
}

#[tokio::test]
async fn test_parses_deltas_in_order() {
    let body = vec![chunk("Hel"), chunk("lo"), finish_chunk(), "data: [DONE]\n\n".to_string()];
    let events: Vec<StreamEvent> = parse_chat_sse_stream(byte_stream(body))
        .map(|e| e.unwrap())
        .collect()
        .await;

    assert_eq!(
        events,
        vec![
            StreamEvent::Message { content: "Hel".to_string() },
            StreamEvent::Message { content: "lo".to_string() },
            StreamEvent::Done { finish_reason: Some("stop".to_string()) },
            StreamEvent::Done { finish_reason: None },
        ]
    );
}

#[tokio::test]
async fn test_chunk_boundaries_do_not_matter() {
    let whole = format!("{}{}data: [DONE]\n\n", chunk("a"), chunk("b"));
    let pieces: Vec<String> = whole
        .as_bytes()
        .chunks(7)
        .map(|c| String::from_utf8(c.to_vec()).unwrap())
        .collect();

    let text: Vec<String> = text_deltas(parse_chat_sse_stream(byte_stream(pieces)))
        .map(|t| t.unwrap())
        .collect()
        .await;

    assert_eq!(text.concat(), "ab");
}

#[tokio::test]
async fn test_ignores_comments_and_other_fields() {
    let body = vec![
        ": keep-alive\n".to_string(),
        "event: message\n".to_string(),
        chunk("x"),
        "data: [DONE]\n".to_string(),
    ];
    let text: Vec<String> = text_deltas(parse_chat_sse_stream(byte_stream(body)))
        .map(|t| t.unwrap())
        .collect()
        .await;

    assert_eq!(text, vec!["x".to_string()]);
}

#[tokio::test]
async fn test_malformed_chunk_is_an_error() {
    let body = vec!["data: {not json}\n".to_string()];
    let events: Vec<_> = parse_chat_sse_stream(byte_stream(body)).collect().await;

    assert_eq!(events.len(), 1);
    assert!(events[0].is_err());
}

#[tokio::test]
async fn test_trailing_line_without_newline() {
    let body = vec![chunk("x"), "data: [DONE]".to_string()];
    let events: Vec<StreamEvent> = parse_chat_sse_stream(byte_stream(body))
        .map(|e| e.unwrap())
        .collect()
        .await;

    assert_eq!(events.last(), Some(&StreamEvent::Done { finish_reason: None }));
}

#[test]
fn test_stream_event_serialization() {
    let event = StreamEvent::Message {
        content: "Test".to_string(),
    };

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"message\""));
    assert!(json.contains("Test"));
}
