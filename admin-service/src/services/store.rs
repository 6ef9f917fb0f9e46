use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::models::{ApiKey, Category, CategoryChanges};
use crate::services::ServiceError;

/// Persistence seam for API keys and categories.
///
/// Each call is a single record-level operation; callers never hold locks
/// across calls. Lookups that miss return `None`/`false` instead of an error
/// so the service layer decides what "not found" means.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn health_check(&self) -> Result<(), ServiceError>;

    async fn insert_api_key(&self, key: &ApiKey) -> Result<(), ServiceError>;
    /// Newest first.
    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ServiceError>;
    async fn find_api_key_by_hash(&self, secret_hash: &str) -> Result<Option<ApiKey>, ServiceError>;
    async fn find_api_key_by_id(&self, id: Uuid) -> Result<Option<ApiKey>, ServiceError>;
    async fn set_api_key_active(&self, id: Uuid, active: bool) -> Result<Option<ApiKey>, ServiceError>;
    async fn touch_api_key(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), ServiceError>;
    async fn delete_api_key(&self, id: Uuid) -> Result<bool, ServiceError>;

    /// Newest first.
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;
    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError>;
    async fn insert_category(&self, category: &Category) -> Result<(), ServiceError>;
    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, ServiceError>;
    async fn delete_category(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// In-memory store used by tests.
pub struct MockStore {
    pub api_keys: Mutex<HashMap<Uuid, ApiKey>>,
    pub categories: Mutex<HashMap<Uuid, Category>>,
    fail_touch: AtomicBool,
    fail_lookups: AtomicBool,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            api_keys: Mutex::new(HashMap::new()),
            categories: Mutex::new(HashMap::new()),
            fail_touch: AtomicBool::new(false),
            fail_lookups: AtomicBool::new(false),
        }
    }

    /// Make every `touch_api_key` call fail.
    pub fn fail_touch(&self, fail: bool) {
        self.fail_touch.store(fail, Ordering::SeqCst);
    }

    /// Make every hash lookup fail, as if the database were unreachable.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    fn keys(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, ApiKey>>, ServiceError> {
        self.api_keys
            .lock()
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Mock store mutex poisoned: {}", e)))
    }

    fn cats(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Category>>, ServiceError> {
        self.categories
            .lock()
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Mock store mutex poisoned: {}", e)))
    }
}

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

#[async_trait]
impl SecretStore for MockStore {
    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn insert_api_key(&self, key: &ApiKey) -> Result<(), ServiceError> {
        let mut keys = self.keys()?;
        if keys.values().any(|k| k.secret_hash == key.secret_hash) {
            return Err(ServiceError::Duplicate("API key hash already exists".to_string()));
        }
        keys.insert(key.id, key.clone());
        Ok(())
    }

    async fn list_api_keys(&self) -> Result<Vec<ApiKey>, ServiceError> {
        let keys = self.keys()?.values().cloned().collect();
        Ok(newest_first(keys, |k: &ApiKey| k.created_at))
    }

    async fn find_api_key_by_hash(&self, secret_hash: &str) -> Result<Option<ApiKey>, ServiceError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(ServiceError::Internal(anyhow::anyhow!("Mock store lookup failure")));
        }
        Ok(self
            .keys()?
            .values()
            .find(|k| k.secret_hash == secret_hash)
            .cloned())
    }

    async fn find_api_key_by_id(&self, id: Uuid) -> Result<Option<ApiKey>, ServiceError> {
        Ok(self.keys()?.get(&id).cloned())
    }

    async fn set_api_key_active(&self, id: Uuid, active: bool) -> Result<Option<ApiKey>, ServiceError> {
        let mut keys = self.keys()?;
        Ok(keys.get_mut(&id).map(|key| {
            key.active = active;
            key.updated_at = Utc::now();
            key.clone()
        }))
    }

    async fn touch_api_key(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), ServiceError> {
        if self.fail_touch.load(Ordering::SeqCst) {
            return Err(ServiceError::Internal(anyhow::anyhow!("Mock store write failure")));
        }
        if let Some(key) = self.keys()?.get_mut(&id) {
            key.last_used_at = Some(used_at);
        }
        Ok(())
    }

    async fn delete_api_key(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.keys()?.remove(&id).is_some())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        let categories = self.cats()?.values().cloned().collect();
        Ok(newest_first(categories, |c: &Category| c.created_at))
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, ServiceError> {
        Ok(self.cats()?.get(&id).cloned())
    }

    async fn insert_category(&self, category: &Category) -> Result<(), ServiceError> {
        self.cats()?.insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(
        &self,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, ServiceError> {
        let mut categories = self.cats()?;
        Ok(categories.get_mut(&id).map(|category| {
            category.apply(changes);
            category.clone()
        }))
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.cats()?.remove(&id).is_some())
    }
}
