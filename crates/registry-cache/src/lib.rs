//! # Registry Cache
//!
//! A write-through-invalidate cache sitting in front of `registry-database`'s
//! reads: [`CacheStore`] is the abstraction the Service layer depends on,
//! [`RedisCacheStore`] the production implementation, [`fake::InMemoryCacheStore`]
//! a deterministic fake for tests. Cache failures are never fatal — they're
//! logged and the caller falls back to storage.
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use registry_cache::{keys, CacheConfig, CacheStore, RedisCacheStore};
//! use uuid::Uuid;
//!
//! let cache = RedisCacheStore::connect(CacheConfig::default()).await?;
//! let key = keys::object_type_by_id(Uuid::new_v4());
//! cache.set(&key, &"payload", cache.default_ttl()).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod fake;
pub mod keys;

pub use client::{CacheStore, RedisCacheStore};
pub use config::CacheConfig;
pub use fake::InMemoryCacheStore;
