use async_trait::async_trait;
use briefcase_types::Conversation;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Result, StoreError};

/// Save/load/delete contract for conversation transcripts.
///
/// The UI talks to this trait only, so a local-only store and a
/// server-backed one are interchangeable.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert or replace by id
    async fn save(&self, conversation: &Conversation) -> Result<()>;

    async fn load(&self, id: &str) -> Result<Option<Conversation>>;

    /// Deleting a missing id is an error
    async fn delete(&self, id: &str) -> Result<()>;

    async fn list(&self) -> Result<Vec<Conversation>>;
}

/// Local-only store; contents vanish with the process
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("store lock poisoned".to_string())
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let mut map = self.conversations.write().map_err(|_| poisoned())?;
        map.insert(conversation.id.clone(), conversation.clone());
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<Conversation>> {
        let map = self.conversations.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut map = self.conversations.write().map_err(|_| poisoned())?;
        map.remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::ConversationNotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<Conversation>> {
        let map = self.conversations.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }
}

/// One `<id>.json` file per conversation under a directory
#[derive(Debug, Clone)]
pub struct JsonFileConversationStore {
    root: PathBuf,
}

impl JsonFileConversationStore {
    /// Creates the directory if needed
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        tracing::info!(path = %root.display(), "Opened conversation store");
        Ok(Self { root })
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl ConversationStore for JsonFileConversationStore {
    async fn save(&self, conversation: &Conversation) -> Result<()> {
        let path = self.path_for(&conversation.id)?;
        let bytes = serde_json::to_vec_pretty(conversation)?;

        // Readers never observe a partially written file; each save owns its temp file
        let tmp = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<Conversation>> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::ConversationNotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<Conversation>> {
        let mut conversations = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = tokio::fs::read(&path).await?;
            match serde_json::from_slice::<Conversation>(&bytes) {
                Ok(conv) => conversations.push(conv),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping unreadable conversation file: {}", e);
                }
            }
        }

        Ok(conversations)
    }
}
