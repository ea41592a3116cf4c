//! An in-memory [`EventPublisher`] fake for tests that don't want a live
//! Kafka broker.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::event::DomainEvent;
use crate::publisher::EventPublisher;

#[derive(Default)]
pub struct InMemoryEventPublisher {
    published: Mutex<Vec<DomainEvent>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<DomainEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: DomainEvent) {
        self.published.lock().unwrap().push(event);
    }

    async fn publish_batch(&self, events: Vec<DomainEvent>) {
        self.published.lock().unwrap().extend(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use uuid::Uuid;

    #[tokio::test]
    async fn publish_records_the_event() {
        let publisher = InMemoryEventPublisher::new();
        let event = DomainEvent::new(EventType::ObjectTypeCreated, Uuid::new_v4(), 1, "alice", serde_json::json!({}));
        publisher.publish(event).await;
        assert_eq!(publisher.published().len(), 1);
    }
}
