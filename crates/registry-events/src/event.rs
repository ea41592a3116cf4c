//! The domain event envelope and its closed set of event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The closed set of events the registry ever publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    ObjectTypeCreated,
    ObjectTypeUpdated,
    ObjectTypeDeleted,
    LinkTypeCreated,
    LinkTypeUpdated,
    LinkTypeDeleted,
}

impl EventType {
    pub fn aggregate_type(&self) -> &'static str {
        match self {
            Self::ObjectTypeCreated | Self::ObjectTypeUpdated | Self::ObjectTypeDeleted => "ObjectType",
            Self::LinkTypeCreated | Self::LinkTypeUpdated | Self::LinkTypeDeleted => "LinkType",
        }
    }
}

/// A single published domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainEvent {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub aggregate_id: Uuid,
    pub aggregate_type: String,
    pub version: i64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl DomainEvent {
    pub fn new(
        event_type: EventType,
        aggregate_id: Uuid,
        version: i64,
        actor: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            aggregate_type: event_type.aggregate_type().to_string(),
            event_type,
            aggregate_id,
            version,
            timestamp: Utc::now(),
            actor: actor.into(),
            data,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The Kafka message key: partitioning by aggregate id gives per-entity
    /// ordering under the broker's default hash partitioner.
    pub fn partition_key(&self) -> String {
        self.aggregate_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_type_is_derived_from_event_type() {
        let event = DomainEvent::new(EventType::ObjectTypeCreated, Uuid::new_v4(), 1, "alice", serde_json::json!({}));
        assert_eq!(event.aggregate_type, "ObjectType");
    }

    #[test]
    fn serializes_with_camel_case_type_tag() {
        let event = DomainEvent::new(EventType::LinkTypeDeleted, Uuid::new_v4(), 3, "bob", serde_json::json!({}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], serde_json::json!("LinkTypeDeleted"));
        assert_eq!(value["aggregateType"], serde_json::json!("LinkType"));
    }
}
