//! Orchestrates `ObjectType` create/update/delete/read/search against
//! persistence, cache, and the event publisher, per the seven-step create
//! flow and its update/delete/read counterparts.

use std::collections::HashMap;

use registry_cache::{keys, CacheStore};
use registry_database::{ListFilter, ObjectTypeRepository};
use registry_domain::{DiffEntry, ObjectType, Property, VersionSnapshot};
use registry_error::{RegistryError, Result};
use registry_events::{DomainEvent, EventPublisher, EventType};
use uuid::Uuid;

use crate::cancellation::{cancellable, Cancellation};

const DEFAULT_TTL: std::time::Duration = std::time::Duration::from_secs(300);
const SEARCH_TTL: std::time::Duration = std::time::Duration::from_secs(120);

/// Partial update for `ObjectType.update`: `None` leaves a field untouched,
/// `Some(None)` on a nullable field clears it.
#[derive(Debug, Default)]
pub struct ObjectTypePatch {
    pub display_name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub properties: Option<Vec<Property>>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl ObjectTypePatch {
    fn apply(self, object_type: &mut ObjectType) {
        if let Some(display_name) = self.display_name {
            object_type.display_name = display_name;
        }
        if let Some(description) = self.description {
            object_type.description = description;
        }
        if let Some(category) = self.category {
            object_type.category = category;
        }
        if let Some(tags) = self.tags {
            object_type.tags = tags;
        }
        if let Some(properties) = self.properties {
            object_type.properties = properties;
        }
        if let Some(metadata) = self.metadata {
            object_type.metadata = metadata;
        }
    }
}

pub struct ObjectTypeService<C: CacheStore, E: EventPublisher> {
    repo: ObjectTypeRepository,
    cache: C,
    publisher: E,
}

impl<C: CacheStore, E: EventPublisher> ObjectTypeService<C, E> {
    pub fn new(repo: ObjectTypeRepository, cache: C, publisher: E) -> Self {
        Self { repo, cache, publisher }
    }

    pub async fn create(&self, name: String, display_name: String, actor: String, cancel: &Cancellation) -> Result<ObjectType> {
        let object_type = ObjectType::new(name, display_name, actor.clone());
        object_type.validate()?;

        cancellable(cancel, self.ensure_name_available(&object_type.name)).await?;

        let created = cancellable(cancel, self.repo.create(&object_type)).await?;

        self.invalidate_derived(cancel).await;
        self.publish(EventType::ObjectTypeCreated, &created, &actor, cancel).await;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: ObjectTypePatch,
        actor: String,
        change_description: Option<String>,
        cancel: &Cancellation,
    ) -> Result<ObjectType> {
        let mut object_type = cancellable(cancel, self.repo.get_by_id(id, false)).await?;

        patch.apply(&mut object_type);
        object_type.increment_version();
        object_type.set_updated_by(actor.clone());
        object_type.validate()?;

        let updated = cancellable(cancel, self.repo.update(&object_type, change_description.as_deref())).await?;

        self.invalidate_for_entity(&updated, cancel).await;
        self.publish(EventType::ObjectTypeUpdated, &updated, &actor, cancel).await;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, actor: String, cancel: &Cancellation) -> Result<()> {
        let object_type = cancellable(cancel, self.repo.get_by_id(id, false)).await?;

        cancellable(cancel, self.repo.delete(id, &actor)).await?;

        self.invalidate_for_entity(&object_type, cancel).await;

        let event = DomainEvent::new(
            EventType::ObjectTypeDeleted,
            object_type.id,
            object_type.version,
            actor,
            serde_json::json!({ "name": object_type.name }),
        );
        self.publisher.publish(event).await;

        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid, cancel: &Cancellation) -> Result<ObjectType> {
        let key = keys::object_type_by_id(id);
        cancellable(cancel, async {
            if let Some(cached) = self.cache.get::<ObjectType>(&key).await {
                return Ok(cached);
            }

            let object_type = self.repo.get_by_id(id, false).await?;
            let _ = self.cache.set(&key, &object_type, DEFAULT_TTL).await;
            Ok(object_type)
        })
        .await
    }

    pub async fn get_by_name(&self, name: &str, cancel: &Cancellation) -> Result<ObjectType> {
        let key = keys::object_type_by_name(name);
        cancellable(cancel, async {
            if let Some(cached) = self.cache.get::<ObjectType>(&key).await {
                return Ok(cached);
            }

            let object_type = self.repo.get_by_name(name).await?;
            let _ = self.cache.set(&key, &object_type, DEFAULT_TTL).await;
            Ok(object_type)
        })
        .await
    }

    pub async fn list(&self, filter: &ListFilter, cancel: &Cancellation) -> Result<registry_database::Page<ObjectType>> {
        cancellable(cancel, self.repo.list(filter)).await
    }

    pub async fn search(&self, query: &str, limit: i64, cancel: &Cancellation) -> Result<Vec<ObjectType>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let key = keys::object_type_search_key(&format!("{}:{}", query, limit));
        cancellable(cancel, async {
            if let Some(cached) = self.cache.get::<Vec<ObjectType>>(&key).await {
                return Ok(cached);
            }

            let results = self.repo.search(query, limit).await?;
            let _ = self.cache.set(&key, &results, SEARCH_TTL).await;
            Ok(results)
        })
        .await
    }

    pub async fn get_version(&self, id: Uuid, version: i64, cancel: &Cancellation) -> Result<VersionSnapshot> {
        cancellable(cancel, self.repo.get_version(id, version)).await
    }

    pub async fn list_versions(&self, id: Uuid, cancel: &Cancellation) -> Result<Vec<VersionSnapshot>> {
        cancellable(cancel, self.repo.list_versions(id)).await
    }

    pub async fn compare_versions(&self, id: Uuid, from: i64, to: i64, cancel: &Cancellation) -> Result<Vec<DiffEntry>> {
        cancellable(cancel, self.repo.compare_versions(id, from, to)).await
    }

    async fn ensure_name_available(&self, name: &str) -> Result<()> {
        match self.repo.get_by_name(name).await {
            Ok(_) => Err(RegistryError::name_exists(name)),
            Err(RegistryError::NotFound(_)) => Ok(()),
            Err(other) => Err(other),
        }
    }

    async fn invalidate_for_entity(&self, object_type: &ObjectType, cancel: &Cancellation) {
        let _ = self.cache.delete(&keys::object_type_by_id(object_type.id)).await;
        let _ = self.cache.delete(&keys::object_type_by_name(&object_type.name)).await;
        self.invalidate_derived(cancel).await;
    }

    async fn invalidate_derived(&self, _cancel: &Cancellation) {
        for pattern in keys::object_type_invalidation_patterns() {
            if let Err(e) = self.cache.invalidate_pattern(&pattern).await {
                tracing::warn!(pattern, error = %e, "failed to invalidate cache pattern");
            }
        }
    }

    async fn publish(&self, event_type: EventType, object_type: &ObjectType, actor: &str, _cancel: &Cancellation) {
        let event = DomainEvent::new(
            event_type,
            object_type.id,
            object_type.version,
            actor,
            serde_json::to_value(object_type).unwrap_or(serde_json::Value::Null),
        );
        self.publisher.publish(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_cache::InMemoryCacheStore;
    use registry_events::InMemoryEventPublisher;

    fn service_fixtures() -> (InMemoryCacheStore, InMemoryEventPublisher) {
        (InMemoryCacheStore::new(), InMemoryEventPublisher::new())
    }

    #[test]
    fn patch_leaves_untouched_fields_alone() {
        let mut object_type = ObjectType::new("Customer", "Customer", "alice");
        let original_tags = object_type.tags.clone();

        let patch = ObjectTypePatch {
            display_name: Some("Customers".to_string()),
            ..Default::default()
        };
        patch.apply(&mut object_type);

        assert_eq!(object_type.display_name, "Customers");
        assert_eq!(object_type.tags, original_tags);
    }

    #[test]
    fn patch_clears_nullable_field_when_given_some_none() {
        let mut object_type = ObjectType::new("Customer", "Customer", "alice");
        object_type.description = Some("old".to_string());

        let patch = ObjectTypePatch { description: Some(None), ..Default::default() };
        patch.apply(&mut object_type);

        assert!(object_type.description.is_none());
    }

    #[test]
    fn fixtures_start_empty() {
        let (cache, publisher) = service_fixtures();
        assert!(cache.is_empty());
        assert!(publisher.published().is_empty());
    }
}
