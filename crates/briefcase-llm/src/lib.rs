pub mod types;
pub mod traits;
pub mod streaming;
pub mod buffer_utils;
pub mod openai;
pub mod config;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions, ResponseFormat,
    TokenUsage,
};

pub use streaming::{StreamEvent, ChatStreamChunk, parse_chat_sse_stream, text_deltas};
pub use buffer_utils::CircularLineBuffer;
pub use openai::OpenAIClient;
pub use config::OpenAIConfig;
pub use types::{Message, Content, Role};
