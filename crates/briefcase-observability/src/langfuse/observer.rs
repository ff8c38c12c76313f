use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

use super::client::LangfuseClient;
use super::types::{Envelope, EventKind, GenerationBody, ScoreBody, TraceBody, Usage};
use crate::observer::Observer;
use crate::types::{Feedback, GenerationObservation, TraceContext};

/// Score name under which end-user ratings are stored
pub const FEEDBACK_SCORE_NAME: &str = "user-feedback";

const TRACE_TAG: &str = "briefcase";

/// Records traces, generations and feedback scores in Langfuse
pub struct LangfuseObserver {
    client: LangfuseClient,
}

impl LangfuseObserver {
    pub fn new(public_key: String, secret_key: String, host: String) -> Result<Self> {
        let client = LangfuseClient::new(public_key, secret_key, host)
            .context("Failed to create Langfuse client")?;

        Ok(Self { client })
    }

    async fn emit<T: Serialize>(&self, kind: EventKind, body: &T) -> Result<()> {
        let envelope = Envelope::wrap(kind, body)
            .with_context(|| format!("Failed to serialize {:?} event", kind))?;
        self.client.ingest(vec![envelope]).await
    }
}

#[async_trait]
impl Observer for LangfuseObserver {
    async fn trace_start(&self, context: TraceContext) -> Result<()> {
        tracing::debug!(trace_id = %context.trace_id, name = %context.name, "Starting Langfuse trace");

        let body = TraceBody {
            id: context.trace_id,
            name: context.name,
            user_id: context.user_id,
            input: context.input,
            metadata: context.metadata,
            tags: vec![TRACE_TAG.to_string()],
            timestamp: context.started_at.to_rfc3339(),
        };
        self.emit(EventKind::TraceCreate, &body).await
    }

    async fn trace_generation(&self, observation: GenerationObservation) -> Result<()> {
        let level = if observation.error.is_some() { "ERROR" } else { "DEFAULT" };

        let body = GenerationBody {
            id: uuid::Uuid::new_v4().to_string(),
            trace_id: observation.trace_id,
            name: observation.name,
            model: observation.model,
            start_time: observation.started_at.to_rfc3339(),
            end_time: observation.ended_at.to_rfc3339(),
            input: observation.input,
            output: observation.output.map(serde_json::Value::String),
            level,
            status_message: observation.error,
            usage: observation.usage.map(|u| Usage {
                input: u.input_tokens,
                output: u.output_tokens,
                total: u.total_tokens,
            }),
        };
        self.emit(EventKind::GenerationCreate, &body).await
    }

    async fn score(&self, feedback: Feedback) -> Result<()> {
        tracing::info!(trace_id = %feedback.trace_id, score = feedback.score, "Recording user feedback");

        let body = ScoreBody {
            id: uuid::Uuid::new_v4().to_string(),
            trace_id: feedback.trace_id,
            name: FEEDBACK_SCORE_NAME.to_string(),
            value: feedback.score,
            comment: feedback.comment,
        };
        self.emit(EventKind::ScoreCreate, &body).await
    }
}
