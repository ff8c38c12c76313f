use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub value: serde_json::Value,
    pub last_modified: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl CacheEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Key/value cache with tag-based invalidation.
///
/// Injected into handlers and services so a shared backend can replace the
/// in-process map for multi-instance deployments.
#[async_trait]
pub trait TagCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;

    async fn set(&self, key: &str, value: serde_json::Value, tags: Vec<String>) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// Remove every entry labeled with `tag`; returns how many were removed
    async fn revalidate_tag(&self, tag: &str) -> Result<usize>;
}

/// Process-local cache. Unbounded and not shared across instances.
#[derive(Debug, Default)]
pub struct MemoryTagCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryTagCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("cache lock poisoned".to_string())
}

#[async_trait]
impl TagCache for MemoryTagCache {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: serde_json::Value, tags: Vec<String>) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                last_modified: Utc::now(),
                tags,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    async fn revalidate_tag(&self, tag: &str) -> Result<usize> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.has_tag(tag));
        let removed = before - entries.len();
        tracing::debug!(tag, removed, "Revalidated cache tag");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryTagCache::new();
        cache.set("k", json!({ "a": 1 }), vec!["t".to_string()]).await.unwrap();

        let entry = cache.get("k").await.unwrap().unwrap();
        assert_eq!(entry.value, json!({ "a": 1 }));
        assert!(entry.has_tag("t"));
        assert!(cache.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revalidate_tag_removes_only_tagged() {
        let cache = MemoryTagCache::new();
        cache.set("a", json!(1), vec!["T".to_string()]).await.unwrap();
        cache.set("b", json!(2), vec!["T".to_string(), "U".to_string()]).await.unwrap();
        cache.set("c", json!(3), vec!["U".to_string()]).await.unwrap();
        cache.set("d", json!(4), vec![]).await.unwrap();

        let removed = cache.revalidate_tag("T").await.unwrap();

        assert_eq!(removed, 2);
        assert!(cache.get("a").await.unwrap().is_none());
        assert!(cache.get("b").await.unwrap().is_none());
        assert_eq!(cache.get("c").await.unwrap().unwrap().value, json!(3));
        assert_eq!(cache.get("d").await.unwrap().unwrap().value, json!(4));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_tags() {
        let cache = MemoryTagCache::new();
        cache.set("a", json!(1), vec!["old".to_string()]).await.unwrap();
        cache.set("a", json!(2), vec!["new".to_string()]).await.unwrap();

        assert_eq!(cache.revalidate_tag("old").await.unwrap(), 0);
        assert_eq!(cache.get("a").await.unwrap().unwrap().value, json!(2));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryTagCache::new();
        cache.set("a", json!(1), vec![]).await.unwrap();
        cache.delete("a").await.unwrap();
        assert!(cache.is_empty());
    }
}
