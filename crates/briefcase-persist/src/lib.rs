pub mod cache;
pub mod error;
pub mod services;
pub mod store;

pub use cache::{CacheEntry, MemoryTagCache, TagCache};
pub use error::{Result, StoreError};
pub use services::{Counter, CounterService, UserData, UserDataService, UserDataUpdate};
pub use store::{ConversationStore, JsonFileConversationStore, MemoryConversationStore};
