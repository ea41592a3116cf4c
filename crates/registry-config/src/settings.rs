//! Concrete configuration schema for the schema registry core.
//!
//! Defaults mirror §6 of the registry design: cache TTLs (5m default / 2m
//! search), DB pool sizing (25 open / 5 idle / 5-min max lifetime), broker
//! destination/consumer-group identity, and the page-size ceiling (default
//! 20, hard max 100).

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level configuration for the schema registry core.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegistryConfig {
    #[validate(nested)]
    pub database: DatabaseSettings,
    #[validate(nested)]
    pub cache: CacheSettings,
    #[validate(nested)]
    pub broker: BrokerSettings,
    #[validate(nested)]
    pub pagination: PaginationSettings,
}

/// Database pool configuration (spec §5, §6).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseSettings {
    #[validate(length(min = 1))]
    pub url: String,
    #[validate(range(min = 1, max = 200))]
    pub max_open: u32,
    #[validate(range(min = 0, max = 200))]
    pub max_idle: u32,
    pub conn_max_lifetime_secs: u64,
    pub conn_max_idle_time_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost:5432/registry".to_string(),
            max_open: 25,
            max_idle: 5,
            conn_max_lifetime_secs: 300,
            conn_max_idle_time_secs: 300,
        }
    }
}

/// Cache TTL configuration (spec §4.B, §6).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CacheSettings {
    #[validate(length(min = 1))]
    pub url: String,
    pub default_ttl_secs: u64,
    pub search_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            default_ttl_secs: 300,
            search_ttl_secs: 120,
        }
    }
}

/// Event broker configuration (spec §4.C, §6).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BrokerSettings {
    #[validate(length(min = 1))]
    pub brokers: String,
    #[validate(length(min = 1))]
    pub topic: String,
    #[validate(length(min = 1))]
    pub group_id: String,
    pub batch_size: u32,
    pub linger_ms: u32,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            topic: "schema-registry-events".to_string(),
            group_id: "schema-registry".to_string(),
            batch_size: 100,
            linger_ms: 10,
        }
    }
}

/// Pagination ceiling configuration (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaginationSettings {
    #[validate(range(min = 1, max = 100))]
    pub default_page_size: u32,
    #[validate(range(min = 1, max = 100))]
    pub max_page_size: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            cache: CacheSettings::default(),
            broker: BrokerSettings::default(),
            pagination: PaginationSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let config = RegistryConfig::default();
        assert_eq!(config.cache.default_ttl_secs, 300);
        assert_eq!(config.cache.search_ttl_secs, 120);
        assert_eq!(config.database.max_open, 25);
        assert_eq!(config.database.max_idle, 5);
        assert_eq!(config.pagination.default_page_size, 20);
        assert_eq!(config.pagination.max_page_size, 100);
    }

    #[test]
    fn default_config_validates() {
        assert!(RegistryConfig::default().validate().is_ok());
    }
}
