//! # Registry Database
//!
//! Durable storage for `ObjectType`/`LinkType` schemas: connection pooling,
//! cursor-based pagination, full-text search, append-only version history,
//! and embedded migrations. Built on `sqlx`'s runtime (non-macro) query API
//! so the registry can build without a live database at compile time.
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use registry_database::{DatabasePool, MigrationRunner, ObjectTypeRepository, PoolConfig};
//!
//! let pool = DatabasePool::connect(PoolConfig::default()).await?;
//! MigrationRunner::run(pool.pool()).await?;
//! let repo = ObjectTypeRepository::new(pool.pool().clone());
//! let count = repo.count(false).await?;
//! println!("{count} object types");
//! # Ok(())
//! # }
//! ```

pub mod cursor;
pub mod filter;
pub mod link_type_repo;
pub mod migrations;
pub mod object_type_repo;
pub mod pool;
pub mod rows;

pub use cursor::{clamp_page_size, Cursor, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use filter::{ListFilter, SortDirection, SortField};
pub use link_type_repo::LinkTypeRepository;
pub use migrations::MigrationRunner;
pub use object_type_repo::{ObjectTypeRepository, Page};
pub use pool::{DatabasePool, PoolConfig, PoolHealth, PoolMetrics};
