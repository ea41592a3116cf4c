//! # Registry Core
//!
//! The facade a deployment actually depends on: takes a [`RegistryConfig`],
//! wires up the Postgres pool, Redis cache, and Kafka publisher it
//! describes, runs embedded migrations, and hands back the two Service
//! handles (`object_types`, `link_types`) an embedding transport calls into.
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use registry_config::RegistryConfig;
//! use registry_core::RegistryCore;
//!
//! let core = RegistryCore::connect(RegistryConfig::default()).await?;
//! let health = core.health_check().await?;
//! println!("database healthy: {}", health.healthy);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use registry_cache::{CacheConfig, RedisCacheStore};
use registry_config::RegistryConfig;
use registry_database::{DatabasePool, LinkTypeRepository, MigrationRunner, ObjectTypeRepository, PoolConfig, PoolHealth};
use registry_error::Result;
use registry_events::{EventPublisherConfig, KafkaEventPublisher};
use registry_service::{LinkTypeService, ObjectTypeService};

pub type ObjectTypes = ObjectTypeService<RedisCacheStore, KafkaEventPublisher>;
pub type LinkTypes = LinkTypeService<RedisCacheStore, KafkaEventPublisher>;

/// Owns every long-lived resource the registry needs: the database pool
/// (also the migration target and health-check source), and the two
/// Service handles built on top of it.
pub struct RegistryCore {
    pool: DatabasePool,
    object_types: ObjectTypes,
    link_types: LinkTypes,
}

impl RegistryCore {
    /// Connect to Postgres, Redis, and Kafka per `config`, run embedded
    /// migrations, and return a ready-to-use facade.
    pub async fn connect(config: RegistryConfig) -> Result<Self> {
        let pool = DatabasePool::connect(pool_config(&config)).await?;
        MigrationRunner::run(pool.pool()).await?;

        let cache = RedisCacheStore::connect(cache_config(&config)).await?;
        let publisher = KafkaEventPublisher::new(publisher_config(&config))?;

        let object_type_repo = ObjectTypeRepository::new(pool.pool().clone());
        let link_type_repo = LinkTypeRepository::new(pool.pool().clone());
        let endpoint_repo = ObjectTypeRepository::new(pool.pool().clone());

        let object_types = ObjectTypeService::new(object_type_repo, cache.clone(), publisher.clone());
        let link_types = LinkTypeService::new(link_type_repo, endpoint_repo, cache, publisher);

        tracing::info!("registry core wired up");

        Ok(Self { pool, object_types, link_types })
    }

    pub fn object_types(&self) -> &ObjectTypes {
        &self.object_types
    }

    pub fn link_types(&self) -> &LinkTypes {
        &self.link_types
    }

    /// Database reachability and pool metrics, suitable for a `/health`
    /// endpoint in an embedding transport.
    pub async fn health_check(&self) -> Result<PoolHealth> {
        self.pool.health_check().await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_config(config: &RegistryConfig) -> PoolConfig {
    PoolConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_open,
        min_connections: config.database.max_idle,
        acquire_timeout: Duration::from_secs(30),
        idle_timeout: Duration::from_secs(config.database.conn_max_idle_time_secs),
        max_lifetime: Duration::from_secs(config.database.conn_max_lifetime_secs),
    }
}

fn cache_config(config: &RegistryConfig) -> CacheConfig {
    CacheConfig {
        url: config.cache.url.clone(),
        default_ttl_secs: config.cache.default_ttl_secs,
        search_ttl_secs: config.cache.search_ttl_secs,
    }
}

fn publisher_config(config: &RegistryConfig) -> EventPublisherConfig {
    EventPublisherConfig {
        brokers: config.broker.brokers.clone(),
        topic: config.broker.topic.clone(),
        batch_size: config.broker.batch_size,
        linger_ms: config.broker.linger_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_maps_database_settings() {
        let config = RegistryConfig::default();
        let pool = pool_config(&config);
        assert_eq!(pool.max_connections, config.database.max_open);
        assert_eq!(pool.min_connections, config.database.max_idle);
    }

    #[test]
    fn cache_config_maps_cache_settings() {
        let config = RegistryConfig::default();
        let cache = cache_config(&config);
        assert_eq!(cache.default_ttl_secs, 300);
        assert_eq!(cache.search_ttl_secs, 120);
    }

    #[test]
    fn publisher_config_maps_broker_settings() {
        let config = RegistryConfig::default();
        let publisher = publisher_config(&config);
        assert_eq!(publisher.topic, config.broker.topic);
        assert_eq!(publisher.batch_size, config.broker.batch_size);
    }
}
