use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;

use super::types::{Envelope, IngestionReport};

/// HTTP client for the Langfuse public ingestion API
pub struct LangfuseClient {
    http: Client,
    endpoint: String,
    public_key: String,
    secret_key: String,
}

impl LangfuseClient {
    /// `host` is the Langfuse base URL, e.g. `https://cloud.langfuse.com`
    pub fn new(public_key: String, secret_key: String, host: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}/api/public/ingestion", host.trim_end_matches('/')),
            public_key,
            secret_key,
        })
    }

    /// Send `events` in one batch.
    ///
    /// Events the service rejects inside a 207 reply are logged, not returned
    /// as errors; only a failed request is.
    pub async fn ingest(&self, events: Vec<Envelope>) -> Result<()> {
        let count = events.len();
        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .json(&json!({ "batch": events }))
            .send()
            .await
            .context("Failed to reach Langfuse")?;

        let status = response.status();
        if status == StatusCode::MULTI_STATUS {
            let report: IngestionReport = response.json().await.unwrap_or_default();
            for rejected in &report.errors {
                tracing::warn!(
                    event_id = %rejected.id,
                    status = rejected.status,
                    "Langfuse rejected event: {}",
                    rejected.message.as_deref().unwrap_or("no message")
                );
            }
            return Ok(());
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Langfuse ingestion failed: {}", body);
            bail!("Langfuse API error: {} - {}", status, body);
        }

        tracing::debug!(count, "Langfuse ingestion accepted");
        Ok(())
    }
}
