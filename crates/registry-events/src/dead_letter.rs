//! Where events land once retries are exhausted. The originating mutation
//! has already committed by the time a sink is invoked — publish failure is
//! never allowed to fail the write.

use async_trait::async_trait;

use crate::event::DomainEvent;

#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn send(&self, event: DomainEvent, error: String);
}

/// Default sink: log the event at error level and move on. Swappable for a
/// real dead-letter topic/table by anything embedding this crate.
pub struct LoggingDeadLetterSink;

#[async_trait]
impl DeadLetterSink for LoggingDeadLetterSink {
    async fn send(&self, event: DomainEvent, error: String) {
        tracing::error!(
            event_id = %event.id,
            aggregate_id = %event.aggregate_id,
            error,
            "event publish exhausted retries, routed to dead letter"
        );
    }
}
