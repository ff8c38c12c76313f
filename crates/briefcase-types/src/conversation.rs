use briefcase_llm::{Message, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title used until the summarizer has produced one
pub const DEFAULT_TITLE: &str = "New Conversation";

/// One message of a conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Some(Utc::now()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

impl From<&ChatMessage> for Message {
    fn from(msg: &ChatMessage) -> Self {
        Message::from_role(msg.role, msg.content.as_str())
    }
}

/// A transcript owned by one browser session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    #[serde(default)]
    messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), Utc::now())
    }

    pub fn with_id(id: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Messages are only ever appended
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Timestamp of the newest message that carries one, else the creation time
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.messages
            .iter()
            .filter_map(|m| m.created_at)
            .max()
            .unwrap_or(self.created_at)
    }

    /// Last exchange, used as summarizer input for title regeneration
    pub fn last_exchange(&self) -> Option<(&ChatMessage, &ChatMessage)> {
        let assistant_idx = self.messages.iter().rposition(|m| m.role == Role::Assistant)?;
        let user = self.messages[..assistant_idx]
            .iter()
            .rev()
            .find(|m| m.role == Role::User)?;
        Some((user, &self.messages[assistant_idx]))
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
