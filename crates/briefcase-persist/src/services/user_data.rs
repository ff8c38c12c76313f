use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::cache::TagCache;
use crate::error::{Result, StoreError};

/// Profile and billing flags kept per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub is_subscribed: bool,
    pub session_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl UserData {
    fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            email: None,
            name: None,
            is_subscribed: false,
            session_id: None,
            updated_at: Utc::now(),
        }
    }
}

/// Partial profile update; `None` fields are left unchanged.
///
/// Billing flags are not part of it: they change only through
/// [`UserDataService::set_subscription`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
}

pub struct UserDataService {
    users: RwLock<HashMap<String, UserData>>,
    cache: Arc<dyn TagCache>,
}

impl UserDataService {
    pub fn new(cache: Arc<dyn TagCache>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            cache,
        }
    }

    pub fn tag(user_id: &str) -> String {
        format!("user:{}", user_id)
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserData>> {
        let key = Self::tag(user_id);
        if let Some(entry) = self.cache.get(&key).await? {
            if let Ok(user) = serde_json::from_value::<UserData>(entry.value) {
                return Ok(Some(user));
            }
        }

        let user = {
            let users = self.users.read().map_err(|_| poisoned())?;
            users.get(user_id).cloned()
        };

        if let Some(user) = &user {
            self.cache
                .set(&key, serde_json::to_value(user)?, vec![Self::tag(user_id)])
                .await?;
        }
        Ok(user)
    }

    pub async fn update(&self, user_id: &str, update: UserDataUpdate) -> Result<UserData> {
        self.modify(user_id, |user| {
            if let Some(email) = update.email {
                user.email = Some(email);
            }
            if let Some(name) = update.name {
                user.name = Some(name);
            }
        })
        .await
    }

    /// Mirror a verified billing outcome into the user's record
    pub async fn set_subscription(
        &self,
        user_id: &str,
        is_subscribed: bool,
        session_id: Option<String>,
    ) -> Result<UserData> {
        self.modify(user_id, |user| {
            user.is_subscribed = is_subscribed;
            user.session_id = session_id;
        })
        .await
    }

    async fn modify(&self, user_id: &str, apply: impl FnOnce(&mut UserData)) -> Result<UserData> {
        let user = {
            let mut users = self.users.write().map_err(|_| poisoned())?;
            let user = users
                .entry(user_id.to_string())
                .or_insert_with(|| UserData::empty(user_id));
            apply(user);
            user.updated_at = Utc::now();
            user.clone()
        };

        self.cache.revalidate_tag(&Self::tag(user_id)).await?;
        Ok(user)
    }
}

fn poisoned() -> StoreError {
    StoreError::Internal("user data lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryTagCache;

    #[tokio::test]
    async fn test_unknown_user() {
        let service = UserDataService::new(Arc::new(MemoryTagCache::new()));
        assert!(service.get("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_is_partial_and_busts_cache() {
        let cache = Arc::new(MemoryTagCache::new());
        let service = UserDataService::new(cache.clone());

        service
            .update(
                "u1",
                UserDataUpdate {
                    email: Some("founder@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let cached = service.get("u1").await.unwrap().unwrap();
        assert!(cache.get("user:u1").await.unwrap().is_some());

        let updated = service
            .set_subscription("u1", true, Some("cs_123".to_string()))
            .await
            .unwrap();

        assert!(cache.get("user:u1").await.unwrap().is_none());
        assert_eq!(updated.email, cached.email);
        assert!(updated.is_subscribed);
        assert_eq!(service.get("u1").await.unwrap().unwrap().session_id.as_deref(), Some("cs_123"));
    }
}
