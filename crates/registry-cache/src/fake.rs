//! An in-memory [`CacheStore`] fake for tests that don't want a live Redis.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use registry_error::Result;
use serde::{de::DeserializeOwned, Serialize};

use crate::client::CacheStore;

#[derive(Default)]
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let raw = self.entries.lock().unwrap().get(key).cloned()?;
        serde_json::from_str(&raw).ok()
    }

    async fn set<T: Serialize + Sync>(&self, key: &str, value: &T, _ttl: Duration) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| registry_error::RegistryError::cache(e.to_string()))?;
        self.entries.lock().unwrap().insert(key.to_string(), raw);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().unwrap().contains_key(key))
    }

    async fn invalidate_pattern(&self, pattern: &str) -> Result<u64> {
        let prefix = pattern.trim_end_matches('*');
        let mut entries = self.entries.lock().unwrap();
        let to_remove: Vec<String> = entries.keys().filter(|k| k.starts_with(prefix)).cloned().collect();
        let count = to_remove.len() as u64;
        for key in to_remove {
            entries.remove(&key);
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = InMemoryCacheStore::new();
        cache.set("k", &"v".to_string(), Duration::from_secs(60)).await.unwrap();
        let value: Option<String> = cache.get("k").await;
        assert_eq!(value, Some("v".to_string()));
    }

    #[tokio::test]
    async fn invalidate_pattern_removes_matching_prefix() {
        let cache = InMemoryCacheStore::new();
        cache.set("objecttypes:list:a", &1, Duration::from_secs(60)).await.unwrap();
        cache.set("objecttypes:list:b", &2, Duration::from_secs(60)).await.unwrap();
        cache.set("objecttype:id:1", &3, Duration::from_secs(60)).await.unwrap();

        let removed = cache.invalidate_pattern("objecttypes:list:*").await.unwrap();
        assert_eq!(removed, 2);
        assert!(cache.exists("objecttype:id:1").await.unwrap());
    }
}
