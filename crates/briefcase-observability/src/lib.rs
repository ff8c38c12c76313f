pub mod observer;
pub mod types;

#[cfg(feature = "langfuse")]
pub mod langfuse;

pub use observer::{NoopObserver, Observer};
pub use types::{Feedback, GenerationObservation, TraceContext, TokenUsage};

#[cfg(feature = "langfuse")]
pub use langfuse::{LangfuseClient, LangfuseObserver};
