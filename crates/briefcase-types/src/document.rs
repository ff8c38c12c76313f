use serde::{Deserialize, Serialize};

/// Text extracted from an uploaded file. The original bytes are not kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Size of the uploaded file in bytes
    pub size: u64,
    pub content: String,
    pub conversation_id: Option<String>,
}

impl Document {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        content: String,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            content,
            conversation_id,
        }
    }
}
