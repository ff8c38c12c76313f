use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::cache::TagCache;
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub id: String,
    pub value: i64,
}

pub struct CounterService {
    counters: RwLock<HashMap<String, i64>>,
    cache: Arc<dyn TagCache>,
}

impl CounterService {
    pub fn new(cache: Arc<dyn TagCache>) -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            cache,
        }
    }

    pub fn tag(id: &str) -> String {
        format!("counter:{}", id)
    }

    /// Unknown ids read as zero
    pub async fn get(&self, id: &str) -> Result<Counter> {
        let key = Self::tag(id);
        if let Some(entry) = self.cache.get(&key).await? {
            if let Ok(counter) = serde_json::from_value::<Counter>(entry.value) {
                return Ok(counter);
            }
        }

        let value = {
            let counters = self.counters.read().map_err(|_| poisoned())?;
            counters.get(id).copied().unwrap_or(0)
        };
        let counter = Counter {
            id: id.to_string(),
            value,
        };

        self.cache
            .set(&key, serde_json::to_value(&counter)?, vec![Self::tag(id)])
            .await?;
        Ok(counter)
    }

    pub async fn increment(&self, id: &str, by: i64) -> Result<Counter> {
        let value = {
            let mut counters = self.counters.write().map_err(|_| poisoned())?;
            let value = counters.entry(id.to_string()).or_insert(0);
            *value = value.saturating_add(by);
            *value
        };

        self.cache.revalidate_tag(&Self::tag(id)).await?;
        tracing::debug!(counter = id, value, "Counter incremented");

        Ok(Counter {
            id: id.to_string(),
            value,
        })
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("counter lock poisoned".to_string())
}
