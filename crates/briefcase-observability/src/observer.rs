use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Feedback, GenerationObservation, TraceContext};

/// Backend that records traces of model calls and user feedback on them.
///
/// Trace and generation calls are fire-and-forget for the chat path; a
/// failed `score` is reported back to whoever submitted the feedback.
#[async_trait]
pub trait Observer: Send + Sync {
    async fn trace_start(&self, context: TraceContext) -> Result<()>;

    async fn trace_generation(&self, observation: GenerationObservation) -> Result<()>;

    async fn score(&self, feedback: Feedback) -> Result<()>;
}

/// Observer used when no tracing backend is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

#[async_trait]
impl Observer for NoopObserver {
    async fn trace_start(&self, context: TraceContext) -> Result<()> {
        tracing::debug!(trace_id = %context.trace_id, "Tracing disabled, trace not recorded");
        Ok(())
    }

    async fn trace_generation(&self, _observation: GenerationObservation) -> Result<()> {
        Ok(())
    }

    async fn score(&self, feedback: Feedback) -> Result<()> {
        tracing::debug!(trace_id = %feedback.trace_id, "Tracing disabled, feedback dropped");
        Ok(())
    }
}
