//! # Registry Configuration Management
//!
//! Centralized configuration loading and validation for the schema registry.
//!
//! ## Features
//!
//! - Environment-based configuration (prefix `REGISTRY_`)
//! - File-based configuration overlay
//! - Validation with detailed error messages
//! - Secret management
//! - Hot reloading support
//!
//! ## Example
//!
//! ```rust,no_run
//! use registry_config::{ConfigLoader, RegistryConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config: RegistryConfig = ConfigLoader::new("schema-registry")
//!     .with_env_prefix("REGISTRY")
//!     .load()?;
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod settings;
pub mod validator;
pub mod secrets;
pub mod hot_reload;

// Re-export main types
pub use loader::ConfigLoader;
pub use secrets::Secret;
pub use validator::ConfigValidationError;
pub use settings::{
    BrokerSettings, CacheSettings, DatabaseSettings, PaginationSettings, RegistryConfig,
};
