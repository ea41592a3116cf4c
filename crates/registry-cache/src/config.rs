//! Cache connection and TTL configuration, independent of any configuration
//! crate so this crate stays embeddable on its own.

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: String,
    pub default_ttl_secs: u64,
    pub search_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            default_ttl_secs: 300,
            search_ttl_secs: 120,
        }
    }
}
