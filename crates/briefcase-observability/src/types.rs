use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use briefcase_llm::TokenUsage;

/// Start of a traced request (one chat turn, one title generation, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceContext {
    pub trace_id: String,
    pub name: String,
    pub user_id: Option<String>,
    pub input: serde_json::Value,
    pub metadata: HashMap<String, serde_json::Value>,
    pub started_at: DateTime<Utc>,
}

impl TraceContext {
    /// New trace with a fresh random id
    pub fn new(name: impl Into<String>, input: serde_json::Value) -> Self {
        Self {
            trace_id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            user_id: None,
            input,
            metadata: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// One model call inside a trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationObservation {
    pub trace_id: String,
    pub name: String,
    pub model: String,
    /// Messages sent to the model, already in provider JSON form
    pub input: serde_json::Value,
    pub output: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub usage: Option<TokenUsage>,
    /// Set when the call failed; recorded with ERROR level
    pub error: Option<String>,
}

/// User feedback attached to an earlier trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub trace_id: String,
    pub score: f64,
    pub comment: Option<String>,
    pub user_id: Option<String>,
}
