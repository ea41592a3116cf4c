//! # Registry Service
//!
//! Orchestrates `ObjectType`/`LinkType` mutations and reads across
//! persistence, cache, and the event publisher: validate, check Persistence
//! invariants, write (transactionally, inside `registry-database`),
//! invalidate the cache, publish the domain event. Every I/O boundary is
//! raced against a caller-supplied cancellation token.
//!
//! [`ObjectTypeService`] and [`LinkTypeService`] are generic over
//! [`registry_cache::CacheStore`] and [`registry_events::EventPublisher`]
//! rather than boxed as trait objects: both traits carry generic async
//! methods and so aren't `dyn`-safe. Callers monomorphize over the concrete
//! `RedisCacheStore`/`KafkaEventPublisher` pair in production and the
//! in-memory fakes in tests.

pub mod cancellation;
pub mod link_type_service;
pub mod object_type_service;

pub use cancellation::{cancellable, Cancellation};
pub use link_type_service::{LinkTypePatch, LinkTypeService};
pub use object_type_service::{ObjectTypePatch, ObjectTypeService};
