//! LinkType: a directed, cardinality-annotated relationship between two
//! ObjectTypes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use registry_error::RegistryError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::property::Property;
use crate::types::Cardinality;

static TYPE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkType {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub source_type_id: Uuid,
    pub target_type_id: Uuid,
    pub cardinality: Cardinality,
    pub properties: Vec<Property>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub version: i64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl LinkType {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        source_type_id: Uuid,
        target_type_id: Uuid,
        cardinality: Cardinality,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        let actor = created_by.into();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            display_name: display_name.into(),
            source_type_id,
            target_type_id,
            cardinality,
            properties: Vec::new(),
            metadata: HashMap::new(),
            version: 1,
            is_deleted: false,
            created_at: now,
            created_by: actor.clone(),
            updated_at: now,
            updated_by: actor,
        }
    }

    /// Enforce name format, presence of source/target ids (always present,
    /// a `Uuid` cannot be nil-by-accident here but `Uuid::nil()` is treated
    /// as absent), and per-property validity. Referential integrity
    /// (endpoints actually existing and not deleted) is a Service-layer
    /// concern, not checked here.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() || self.name.len() > MAX_NAME_LEN {
            return Err(RegistryError::invalid_input(
                "name",
                &format!("name must be 1-{} characters", MAX_NAME_LEN),
            ));
        }

        if !TYPE_NAME_REGEX.is_match(&self.name) {
            return Err(RegistryError::invalid_input(
                "name",
                "name must match ^[A-Za-z][A-Za-z0-9_]*$",
            ));
        }

        if self.display_name.trim().is_empty() {
            return Err(RegistryError::invalid_input(
                "displayName",
                "display name must not be empty",
            ));
        }

        if self.source_type_id.is_nil() {
            return Err(RegistryError::invalid_input("sourceTypeId", "source type id is required"));
        }

        if self.target_type_id.is_nil() {
            return Err(RegistryError::invalid_input("targetTypeId", "target type id is required"));
        }

        for property in &self.properties {
            property.validate()?;
        }

        Ok(())
    }

    pub fn increment_version(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    pub fn set_updated_by(&mut self, user: impl Into<String>) {
        self.updated_by = user.into();
    }

    /// Whether this link's endpoints are the same ObjectType, the only
    /// shape for which a circular-reference check is meaningful.
    pub fn is_self_referential(&self) -> bool {
        self.source_type_id == self.target_type_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_link_type_starts_at_version_one() {
        let link = LinkType::new(
            "WorksAt",
            "Works At",
            Uuid::new_v4(),
            Uuid::new_v4(),
            Cardinality::ManyToMany,
            "alice",
        );
        assert_eq!(link.version, 1);
        assert!(link.validate().is_ok());
    }

    #[test]
    fn nil_source_id_rejected() {
        let mut link = LinkType::new(
            "WorksAt",
            "Works At",
            Uuid::new_v4(),
            Uuid::new_v4(),
            Cardinality::ManyToMany,
            "alice",
        );
        link.source_type_id = Uuid::nil();
        assert!(link.validate().is_err());
    }

    #[test]
    fn self_referential_detection() {
        let shared = Uuid::new_v4();
        let link = LinkType::new("ReportsTo", "Reports To", shared, shared, Cardinality::OneToMany, "alice");
        assert!(link.is_self_referential());
    }
}
