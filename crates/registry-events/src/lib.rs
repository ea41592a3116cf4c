//! # Registry Events
//!
//! Publishes the schema registry's domain events — `ObjectTypeCreated`,
//! `LinkTypeUpdated`, and the rest of the closed [`EventType`] set — to
//! Kafka, partitioned by aggregate id, with bounded exponential-backoff
//! retry and a dead-letter fallback on exhaustion. A publish failure never
//! fails the mutation that triggered it.
//!
//! ## Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use registry_events::{DomainEvent, EventPublisher, EventPublisherConfig, EventType, KafkaEventPublisher};
//! use uuid::Uuid;
//!
//! let publisher = KafkaEventPublisher::new(EventPublisherConfig::default())?;
//! let event = DomainEvent::new(EventType::ObjectTypeCreated, Uuid::new_v4(), 1, "alice", serde_json::json!({}));
//! publisher.publish(event).await;
//! # Ok(())
//! # }
//! ```

pub mod dead_letter;
pub mod event;
pub mod fake;
pub mod publisher;
pub mod retry;

pub use dead_letter::{DeadLetterSink, LoggingDeadLetterSink};
pub use event::{DomainEvent, EventType};
pub use fake::InMemoryEventPublisher;
pub use publisher::{EventPublisher, EventPublisherConfig, KafkaEventPublisher};
pub use retry::RetryPolicy;
