//! Row shapes returned by `sqlx::query_as`, and their conversion to the
//! domain types in `registry-domain`. Kept separate from the domain crate so
//! the domain stays free of any storage-format concerns.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use registry_domain::{Cardinality, LinkType, ObjectType, Property};
use registry_error::{RegistryError, Result};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct ObjectTypeRow {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub properties: serde_json::Value,
    pub metadata: serde_json::Value,
    pub version: i64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl TryFrom<ObjectTypeRow> for ObjectType {
    type Error = RegistryError;

    fn try_from(row: ObjectTypeRow) -> Result<Self> {
        let properties: Vec<Property> = serde_json::from_value(row.properties)
            .map_err(|e| RegistryError::storage(format!("corrupt properties column: {}", e)))?;
        let metadata: HashMap<String, serde_json::Value> = serde_json::from_value(row.metadata)
            .map_err(|e| RegistryError::storage(format!("corrupt metadata column: {}", e)))?;

        Ok(ObjectType {
            id: row.id,
            name: row.name,
            display_name: row.display_name,
            description: row.description,
            category: row.category,
            tags: row.tags,
            properties,
            metadata,
            version: row.version,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct LinkTypeRow {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub source_type_id: Uuid,
    pub target_type_id: Uuid,
    pub cardinality: String,
    pub properties: serde_json::Value,
    pub metadata: serde_json::Value,
    pub version: i64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl TryFrom<LinkTypeRow> for LinkType {
    type Error = RegistryError;

    fn try_from(row: LinkTypeRow) -> Result<Self> {
        let properties: Vec<Property> = serde_json::from_value(row.properties)
            .map_err(|e| RegistryError::storage(format!("corrupt properties column: {}", e)))?;
        let metadata: HashMap<String, serde_json::Value> = serde_json::from_value(row.metadata)
            .map_err(|e| RegistryError::storage(format!("corrupt metadata column: {}", e)))?;
        let cardinality = decode_cardinality(&row.cardinality)?;

        Ok(LinkType {
            id: row.id,
            name: row.name,
            display_name: row.display_name,
            source_type_id: row.source_type_id,
            target_type_id: row.target_type_id,
            cardinality,
            properties,
            metadata,
            version: row.version,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

pub fn encode_cardinality(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::OneToOne => "ONE_TO_ONE",
        Cardinality::OneToMany => "ONE_TO_MANY",
        Cardinality::ManyToMany => "MANY_TO_MANY",
    }
}

fn decode_cardinality(raw: &str) -> Result<Cardinality> {
    match raw {
        "ONE_TO_ONE" => Ok(Cardinality::OneToOne),
        "ONE_TO_MANY" => Ok(Cardinality::OneToMany),
        "MANY_TO_MANY" => Ok(Cardinality::ManyToMany),
        other => Err(RegistryError::storage(format!("unknown cardinality in storage: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinality_round_trips() {
        for c in [Cardinality::OneToOne, Cardinality::OneToMany, Cardinality::ManyToMany] {
            let encoded = encode_cardinality(c);
            assert_eq!(decode_cardinality(encoded).unwrap(), c);
        }
    }
}
