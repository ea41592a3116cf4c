//! ObjectType: a named schema for a class of business entity.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use registry_error::RegistryError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::property::Property;

static TYPE_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectType {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub properties: Vec<Property>,
    pub metadata: HashMap<String, serde_json::Value>,
    pub version: i64,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl ObjectType {
    /// Construct a fresh ObjectType at version 1, stamped with the creating
    /// user's identity. Callers still must call [`ObjectType::validate`]
    /// before persisting.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, created_by: impl Into<String>) -> Self {
        let now = Utc::now();
        let actor = created_by.into();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            display_name: display_name.into(),
            description: None,
            category: None,
            tags: Vec::new(),
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

    /// Enforce name format/length, display-name presence, per-property
    /// validity, and unique property names. Returns the first failure.
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

        for property in &self.properties {
            property.validate()?;
        }

        let mut seen = std::collections::HashSet::new();
        for property in &self.properties {
            if !seen.insert(&property.name) {
                return Err(RegistryError::invalid_input(
                    "properties",
                    &format!("duplicate property name '{}'", property.name),
                ));
            }
        }

        Ok(())
    }

    /// Bump the version and refresh `updatedAt`.
    pub fn increment_version(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// Stamp the acting user as the last editor.
    pub fn set_updated_by(&mut self, user: impl Into<String>) {
        self.updated_by = user.into();
    }

    /// Add a property, rejecting a duplicate name.
    pub fn add_property(&mut self, property: Property) -> Result<(), RegistryError> {
        if self.properties.iter().any(|p| p.name == property.name) {
            return Err(RegistryError::invalid_input(
                "properties",
                &format!("property '{}' already exists", property.name),
            ));
        }
        self.properties.push(property);
        Ok(())
    }

    /// Replace an existing property by name, preserving name uniqueness.
    pub fn update_property(&mut self, name: &str, property: Property) -> Result<(), RegistryError> {
        let index = self
            .properties
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| RegistryError::not_found(format!("property '{}'", name)))?;

        if property.name != name && self.properties.iter().any(|p| p.name == property.name) {
            return Err(RegistryError::invalid_input(
                "properties",
                &format!("property '{}' already exists", property.name),
            ));
        }

        self.properties[index] = property;
        Ok(())
    }

    /// Remove a property by name.
    pub fn remove_property(&mut self, name: &str) -> Result<(), RegistryError> {
        let index = self
            .properties
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| RegistryError::not_found(format!("property '{}'", name)))?;
        self.properties.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;

    fn email_property() -> Property {
        Property {
            id: Uuid::new_v4(),
            name: "email".to_string(),
            display_name: "Email".to_string(),
            data_type: DataType::String,
            required: true,
            unique: false,
            indexed: false,
            default_value: None,
            validators: vec![],
        }
    }

    #[test]
    fn new_object_type_starts_at_version_one() {
        let object_type = ObjectType::new("Customer", "Customer", "alice");
        assert_eq!(object_type.version, 1);
        assert!(!object_type.is_deleted);
        assert!(object_type.validate().is_ok());
    }

    #[test]
    fn name_too_long_is_rejected() {
        let mut object_type = ObjectType::new("a".repeat(65), "Customer", "alice");
        object_type.name = "a".repeat(65);
        assert!(object_type.validate().is_err());
    }

    #[test]
    fn duplicate_property_names_rejected() {
        let mut object_type = ObjectType::new("Customer", "Customer", "alice");
        object_type.properties.push(email_property());
        object_type.properties.push(email_property());
        assert!(object_type.validate().is_err());
    }

    #[test]
    fn add_property_rejects_duplicate() {
        let mut object_type = ObjectType::new("Customer", "Customer", "alice");
        object_type.add_property(email_property()).unwrap();
        assert!(object_type.add_property(email_property()).is_err());
    }

    #[test]
    fn increment_version_bumps_and_touches_updated_at() {
        let mut object_type = ObjectType::new("Customer", "Customer", "alice");
        let before = object_type.updated_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        object_type.increment_version();
        assert_eq!(object_type.version, 2);
        assert!(object_type.updated_at >= before);
    }

    #[test]
    fn remove_property_then_not_found_on_missing() {
        let mut object_type = ObjectType::new("Customer", "Customer", "alice");
        object_type.add_property(email_property()).unwrap();
        object_type.remove_property("email").unwrap();
        assert!(object_type.remove_property("email").is_err());
    }
}
