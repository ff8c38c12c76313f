//! Wire format of the Langfuse ingestion endpoint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    TraceCreate,
    GenerationCreate,
    ScoreCreate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceBody {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub input: serde_json::Value,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
    pub tags: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationBody {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    pub model: String,
    pub start_time: String,
    pub end_time: String,
    pub input: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// `DEFAULT` or `ERROR`
    pub level: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// Token counts in Langfuse's own field names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input: u32,
    pub output: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBody {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One envelope in the `batch` array
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub id: String,
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub body: serde_json::Value,
}

impl Envelope {
    pub fn wrap<T: Serialize>(kind: EventKind, body: &T) -> serde_json::Result<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            kind,
            body: serde_json::to_value(body)?,
        })
    }
}

/// Per-event outcome listed in a 207 reply
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestionReport {
    #[serde(default)]
    pub errors: Vec<RejectedEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectedEvent {
    pub id: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_uses_kebab_case_type() {
        let score = ScoreBody {
            id: "s1".into(),
            trace_id: "t1".into(),
            name: "user-feedback".into(),
            value: 1.0,
            comment: None,
        };
        let json = serde_json::to_value(Envelope::wrap(EventKind::ScoreCreate, &score).unwrap()).unwrap();

        assert_eq!(json["type"], "score-create");
        assert_eq!(json["body"]["traceId"], "t1");
        assert!(json["body"].get("comment").is_none());
    }
}
