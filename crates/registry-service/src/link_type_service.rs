//! Orchestrates `LinkType` create/update/delete/read against persistence,
//! cache, and the event publisher. Create adds two guards ObjectType create
//! doesn't need: endpoint existence/liveness, and a circular-reference check
//! for self-referential links.

use std::collections::HashMap;

use registry_cache::{keys, CacheStore};
use registry_database::{LinkTypeRepository, ListFilter, ObjectTypeRepository};
use registry_domain::{Cardinality, DiffEntry, LinkType, Property, VersionSnapshot};
use registry_error::{RegistryError, Result};
use registry_events::{DomainEvent, EventPublisher, EventType};
use uuid::Uuid;

use crate::cancellation::{cancellable, Cancellation};

const DEFAULT_TTL: std::time::Duration = std::time::Duration::from_secs(300);

/// Partial update for `LinkType.update`. Endpoints and cardinality are
/// immutable after creation — changing a relationship's shape is a new
/// LinkType, not an edit to an existing one.
#[derive(Debug, Default)]
pub struct LinkTypePatch {
    pub display_name: Option<String>,
    pub properties: Option<Vec<Property>>,
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl LinkTypePatch {
    fn apply(self, link_type: &mut LinkType) {
        if let Some(display_name) = self.display_name {
            link_type.display_name = display_name;
        }
        if let Some(properties) = self.properties {
            link_type.properties = properties;
        }
        if let Some(metadata) = self.metadata {
            link_type.metadata = metadata;
        }
    }
}

pub struct LinkTypeService<C: CacheStore, E: EventPublisher> {
    repo: LinkTypeRepository,
    object_types: ObjectTypeRepository,
    cache: C,
    publisher: E,
}

impl<C: CacheStore, E: EventPublisher> LinkTypeService<C, E> {
    pub fn new(repo: LinkTypeRepository, object_types: ObjectTypeRepository, cache: C, publisher: E) -> Self {
        Self { repo, object_types, cache, publisher }
    }

    pub async fn create(
        &self,
        name: String,
        display_name: String,
        source_type_id: Uuid,
        target_type_id: Uuid,
        cardinality: Cardinality,
        actor: String,
        cancel: &Cancellation,
    ) -> Result<LinkType> {
        let link_type = LinkType::new(name, display_name, source_type_id, target_type_id, cardinality, actor.clone());
        link_type.validate()?;

        cancellable(cancel, self.ensure_name_available(&link_type.name)).await?;
        cancellable(cancel, self.ensure_endpoints_live(source_type_id, target_type_id)).await?;

        if link_type.is_self_referential() {
            let cyclic = cancellable(cancel, self.repo.check_circular_reference(source_type_id)).await?;
            if cyclic {
                return Err(RegistryError::circular_reference(format!(
                    "object type '{}' already participates in a cycle of live link types",
                    source_type_id
                )));
            }
        }

        let created = cancellable(cancel, self.repo.create(&link_type)).await?;

        self.invalidate_derived(cancel).await;
        self.publish(EventType::LinkTypeCreated, &created, &actor).await;

        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: LinkTypePatch,
        actor: String,
        change_description: Option<String>,
        cancel: &Cancellation,
    ) -> Result<LinkType> {
        let mut link_type = cancellable(cancel, self.repo.get_by_id(id, false)).await?;

        patch.apply(&mut link_type);
        link_type.increment_version();
        link_type.set_updated_by(actor.clone());
        link_type.validate()?;

        let updated = cancellable(cancel, self.repo.update(&link_type, change_description.as_deref())).await?;

        self.invalidate_for_entity(&updated, cancel).await;
        self.publish(EventType::LinkTypeUpdated, &updated, &actor).await;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, actor: String, cancel: &Cancellation) -> Result<()> {
        let link_type = cancellable(cancel, self.repo.get_by_id(id, false)).await?;

        cancellable(cancel, self.repo.delete(id, &actor)).await?;

        self.invalidate_for_entity(&link_type, cancel).await;

        let event = DomainEvent::new(
            EventType::LinkTypeDeleted,
            link_type.id,
            link_type.version,
            actor,
            serde_json::json!({ "name": link_type.name }),
        );
        self.publisher.publish(event).await;

        Ok(())
    }

    /// Every live LinkType whose source or target is `object_type_id`, used
    /// by `ObjectTypeService` to decide whether a delete must be rejected
    /// for having dependents.
    pub async fn list_for_object_type(&self, object_type_id: Uuid, cancel: &Cancellation) -> Result<Vec<LinkType>> {
        cancellable(cancel, self.repo.list_for_object_type(object_type_id)).await
    }

    pub async fn get_by_id(&self, id: Uuid, cancel: &Cancellation) -> Result<LinkType> {
        let key = keys::link_type_by_id(id);
        cancellable(cancel, async {
            if let Some(cached) = self.cache.get::<LinkType>(&key).await {
                return Ok(cached);
            }

            let link_type = self.repo.get_by_id(id, false).await?;
            let _ = self.cache.set(&key, &link_type, DEFAULT_TTL).await;
            Ok(link_type)
        })
        .await
    }

    pub async fn get_by_name(&self, name: &str, cancel: &Cancellation) -> Result<LinkType> {
        let key = keys::link_type_by_name(name);
        cancellable(cancel, async {
            if let Some(cached) = self.cache.get::<LinkType>(&key).await {
                return Ok(cached);
            }

            let link_type = self.repo.get_by_name(name).await?;
            let _ = self.cache.set(&key, &link_type, DEFAULT_TTL).await;
            Ok(link_type)
        })
        .await
    }

    pub async fn list(&self, filter: &ListFilter, cancel: &Cancellation) -> Result<registry_database::Page<LinkType>> {
        cancellable(cancel, self.repo.list(filter)).await
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

    async fn ensure_endpoints_live(&self, source_type_id: Uuid, target_type_id: Uuid) -> Result<()> {
        self.object_types.get_by_id(source_type_id, false).await.map_err(|e| match e {
            RegistryError::NotFound(_) => RegistryError::referential_integrity(format!("source object type '{}' does not exist", source_type_id)),
            other => other,
        })?;

        if target_type_id != source_type_id {
            self.object_types.get_by_id(target_type_id, false).await.map_err(|e| match e {
                RegistryError::NotFound(_) => {
                    RegistryError::referential_integrity(format!("target object type '{}' does not exist", target_type_id))
                }
                other => other,
            })?;
        }

        Ok(())
    }

    async fn invalidate_for_entity(&self, link_type: &LinkType, cancel: &Cancellation) {
        let _ = self.cache.delete(&keys::link_type_by_id(link_type.id)).await;
        let _ = self.cache.delete(&keys::link_type_by_name(&link_type.name)).await;
        self.invalidate_derived(cancel).await;
    }

    async fn invalidate_derived(&self, _cancel: &Cancellation) {
        for pattern in keys::link_type_invalidation_patterns() {
            if let Err(e) = self.cache.invalidate_pattern(&pattern).await {
                tracing::warn!(pattern, error = %e, "failed to invalidate cache pattern");
            }
        }
    }

    async fn publish(&self, event_type: EventType, link_type: &LinkType, actor: &str) {
        let event = DomainEvent::new(
            event_type,
            link_type.id,
            link_type.version,
            actor,
            serde_json::to_value(link_type).unwrap_or(serde_json::Value::Null),
        );
        self.publisher.publish(event).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_leaves_endpoints_and_cardinality_untouched() {
        let mut link_type = LinkType::new(
            "WorksAt",
            "Works At",
            Uuid::new_v4(),
            Uuid::new_v4(),
            Cardinality::ManyToMany,
            "alice",
        );
        let original_source = link_type.source_type_id;
        let original_cardinality = link_type.cardinality;

        let patch = LinkTypePatch { display_name: Some("Employed By".to_string()), ..Default::default() };
        patch.apply(&mut link_type);

        assert_eq!(link_type.display_name, "Employed By");
        assert_eq!(link_type.source_type_id, original_source);
        assert_eq!(link_type.cardinality, original_cardinality);
    }
}
