//! `EventPublisher`: publish domain events to Kafka, partitioned by
//! aggregate id, with bounded retry and dead-letter fallback.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use registry_error::{RegistryError, Result};

use crate::dead_letter::{DeadLetterSink, LoggingDeadLetterSink};
use crate::event::DomainEvent;
use crate::retry::RetryPolicy;

/// Broker configuration, independent of any configuration crate so this
/// crate stays embeddable on its own.
#[derive(Debug, Clone)]
pub struct EventPublisherConfig {
    pub brokers: String,
    pub topic: String,
    pub batch_size: u32,
    pub linger_ms: u32,
}

impl Default for EventPublisherConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            topic: "schema-registry-events".to_string(),
            batch_size: 100,
            linger_ms: 10,
        }
    }
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event. Never returns an error to the caller: on
    /// retry exhaustion the event is routed to the dead-letter sink and
    /// `Ok(())` is still returned, since a publish failure must never fail
    /// the originating mutation.
    async fn publish(&self, event: DomainEvent);

    /// Publish a batch atomically within the transport's batch guarantees:
    /// either every event in the call lands on the broker, or the whole
    /// batch is retried as a unit. On exhaustion every event in the batch is
    /// dead-lettered together.
    async fn publish_batch(&self, events: Vec<DomainEvent>);
}

#[derive(Clone)]
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    topic: String,
    retry_policy: RetryPolicy,
    dead_letter: Arc<dyn DeadLetterSink>,
}

impl KafkaEventPublisher {
    pub fn new(config: EventPublisherConfig) -> Result<Self> {
        Self::with_dead_letter(config, Arc::new(LoggingDeadLetterSink))
    }

    pub fn with_dead_letter(config: EventPublisherConfig, dead_letter: Arc<dyn DeadLetterSink>) -> Result<Self> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "10000")
            .set("acks", "all")
            .set("batch.size", config.batch_size.to_string())
            .set("linger.ms", config.linger_ms.to_string())
            .create()
            .map_err(|e| RegistryError::publish(format!("failed to create kafka producer: {}", e)))?;

        Ok(Self {
            producer,
            topic: config.topic,
            retry_policy: RetryPolicy::default(),
            dead_letter,
        })
    }

    async fn send_once(&self, event: &DomainEvent) -> Result<()> {
        let payload = serde_json::to_vec(event).map_err(|e| RegistryError::publish(e.to_string()))?;
        let key = event.partition_key();

        let record = FutureRecord::to(&self.topic).key(&key).payload(&payload);

        self.producer
            .send(record, Timeout::After(Duration::from_secs(10)))
            .await
            .map_err(|(e, _)| RegistryError::publish(e.to_string()))?;

        Ok(())
    }

    async fn send_with_retry(&self, event: &DomainEvent) -> Result<()> {
        let mut last_error = None;

        for attempt in 0..self.retry_policy.max_attempts {
            match self.send_once(event).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, event_id = %event.id, "event publish attempt failed");
                    last_error = Some(e);
                    tokio::time::sleep(self.retry_policy.delay_for_attempt(attempt)).await;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| RegistryError::publish("exhausted retries with no recorded error")))
    }
}

#[async_trait]
impl EventPublisher for KafkaEventPublisher {
    async fn publish(&self, event: DomainEvent) {
        if let Err(e) = self.send_with_retry(&event).await {
            self.dead_letter.send(event, e.to_string()).await;
        }
    }

    async fn publish_batch(&self, events: Vec<DomainEvent>) {
        let mut last_error = String::new();
        let mut succeeded = false;

        for attempt in 0..self.retry_policy.max_attempts {
            let results = futures_batch_send(self, &events).await;
            if results.iter().all(Result::is_ok) {
                succeeded = true;
                break;
            }

            last_error = results
                .into_iter()
                .find_map(Result::err)
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown batch publish failure".to_string());

            tracing::warn!(attempt, error = last_error, batch_size = events.len(), "batch publish attempt failed");
            tokio::time::sleep(self.retry_policy.delay_for_attempt(attempt)).await;
        }

        if !succeeded {
            for event in events {
                self.dead_letter.send(event, last_error.clone()).await;
            }
        }
    }
}

async fn futures_batch_send(publisher: &KafkaEventPublisher, events: &[DomainEvent]) -> Vec<Result<()>> {
    let sends = events.iter().map(|event| publisher.send_once(event));
    futures_util::future::join_all(sends).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_spec() {
        let config = EventPublisherConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.linger_ms, 10);
        assert_eq!(config.topic, "schema-registry-events");
    }
}
