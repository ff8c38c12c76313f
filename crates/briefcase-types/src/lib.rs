pub mod conversation;
pub mod document;
pub mod fee;
pub mod grouping;

pub use briefcase_llm::Role;
pub use conversation::{ChatMessage, Conversation, DEFAULT_TITLE};
pub use document::Document;
pub use fee::{FeeEstimate, FeeResult, HOURLY_RATE};
pub use grouping::{group_conversations, ConversationGroup, DateGroup};
