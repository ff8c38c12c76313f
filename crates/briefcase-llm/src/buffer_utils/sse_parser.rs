use anyhow::Result;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use std::pin::Pin;

use super::buffering::CircularLineBuffer;
use crate::StreamEvent;

/// Strategy for turning SSE `data:` payloads into stream events
pub trait SseLineParser: Send {
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>>;

    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Generic SSE parser over any byte-chunk stream.
///
/// Non-`data:` lines (comments, `event:`, `id:`) are ignored. The stream ends
/// after the done marker or when the upstream closes.
pub fn parse_sse_stream<S, B, E, P>(
    byte_stream: S,
    parser: P,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
    P: SseLineParser + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(byte_stream);
        let mut buffer = CircularLineBuffer::with_capacity(4096);
        let mut finished = false;

        'outer: while let Some(chunk_result) = byte_chunks.next().await {
            match chunk_result {
                Ok(bytes) => {
                    buffer.extend(bytes.as_ref());

                    while let Some(line_result) = buffer.next_line() {
                        match line_result {
                            Ok(line) => {
                                match handle_line(&line, &parser) {
                                    LineOutcome::Events(events) => {
                                        for event in events {
                                            yield Ok(event);
                                        }
                                    }
                                    LineOutcome::Done => {
                                        yield Ok(StreamEvent::Done { finish_reason: None });
                                        finished = true;
                                        break 'outer;
                                    }
                                    LineOutcome::Failed(e) => yield Err(e),
                                    LineOutcome::Skip => {}
                                }
                            }
                            Err(e) => yield Err(e),
                        }
                    }
                }
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    finished = true;
                    break;
                }
            }
        }

        if !finished {
            if let Some(Ok(line)) = buffer.take_remainder() {
                match handle_line(&line, &parser) {
                    LineOutcome::Events(events) => {
                        for event in events {
                            yield Ok(event);
                        }
                    }
                    LineOutcome::Done => yield Ok(StreamEvent::Done { finish_reason: None }),
                    LineOutcome::Failed(e) => yield Err(e),
                    LineOutcome::Skip => {}
                }
            }
        }
    })
}

enum LineOutcome {
    Events(Vec<StreamEvent>),
    Done,
    Failed(anyhow::Error),
    Skip,
}

fn handle_line<P: SseLineParser>(line: &str, parser: &P) -> LineOutcome {
    let line = line.trim();
    let Some(data) = line.strip_prefix("data:") else {
        return LineOutcome::Skip;
    };
    let data = data.trim_start();

    if parser.is_done_marker(data) {
        return LineOutcome::Done;
    }

    match parser.parse_data_line(data) {
        Ok(events) => LineOutcome::Events(events),
        Err(e) => LineOutcome::Failed(e),
    }
}
