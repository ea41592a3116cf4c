//! # Registry Error Handling
//!
//! Shared error taxonomy used across the schema registry's persistence,
//! cache, event-publishing, domain, and service crates.
//!
//! The taxonomy is semantic, not tied to any one transport: `NotFound`,
//! `NameExists`, `CircularReference`, `InvalidInput`, `ReferentialIntegrity`,
//! `StorageError`, `CacheError`, `PublishError`, `Cancelled`.
//!
//! ## Example
//!
//! ```rust
//! use registry_error::RegistryError;
//!
//! fn example() -> Result<(), RegistryError> {
//!     Err(RegistryError::invalid_input("name", "must match ^[A-Za-z][A-Za-z0-9_]*$"))
//! }
//! ```

pub mod error;

// Re-export the main types
pub use error::{ErrorResponse, RegistryError};

/// Result type alias using [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
