//! Postgres connection pool management.

use std::time::Duration;

use registry_error::{RegistryError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Pool-level configuration, independent of any configuration crate so this
/// crate stays embeddable without pulling in the registry's config layer.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost:5432/registry".to_string(),
            max_connections: 25,
            min_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(300),
        }
    }
}

/// Owns the pool and exposes health/metrics for the observability layer.
#[derive(Clone)]
pub struct DatabasePool {
    pool: PgPool,
    config: PoolConfig,
}

impl DatabasePool {
    pub async fn connect(config: PoolConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.url)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to connect to database");
                RegistryError::storage(e.to_string())
            })?;

        tracing::info!(max_connections = config.max_connections, "connected to database");

        Ok(Self { pool, config })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<PoolHealth> {
        let start = std::time::Instant::now();

        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => Ok(PoolHealth {
                healthy: true,
                response_time_ms: start.elapsed().as_millis() as u64,
                metrics: self.metrics(),
            }),
            Err(e) => {
                tracing::error!(error = %e, "database health check failed");
                Ok(PoolHealth {
                    healthy: false,
                    response_time_ms: start.elapsed().as_millis() as u64,
                    metrics: self.metrics(),
                })
            }
        }
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_connections: self.config.max_connections,
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PoolMetrics {
    pub size: u32,
    pub idle: u32,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct PoolHealth {
    pub healthy: bool,
    pub response_time_ms: u64,
    pub metrics: PoolMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec() {
        let config = PoolConfig::default();
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_connections, 5);
    }
}
