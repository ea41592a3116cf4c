//! Property: a typed attribute of an [`crate::ObjectType`].

use once_cell::sync::Lazy;
use regex::Regex;
use registry_error::RegistryError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{DataType, Validator};

// Property names must start lowercase, unlike ObjectType/LinkType names.
static PROPERTY_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][A-Za-z0-9_]*$").unwrap());

const MAX_NAME_LEN: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub data_type: DataType,
    pub required: bool,
    pub unique: bool,
    pub indexed: bool,
    pub default_value: Option<serde_json::Value>,
    pub validators: Vec<Validator>,
}

impl Property {
    /// Validate this property in isolation: name format, data-type validity
    /// (trivially true, `DataType` is a closed enum), validator
    /// type-compatibility, and default-value compatibility.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.is_empty() || self.name.len() > MAX_NAME_LEN {
            return Err(RegistryError::invalid_input(
                "name",
                &format!("property name must be 1-{} characters", MAX_NAME_LEN),
            ));
        }

        if !PROPERTY_NAME_REGEX.is_match(&self.name) {
            return Err(RegistryError::invalid_input(
                "name",
                "property name must match ^[a-z][A-Za-z0-9_]*$",
            ));
        }

        if self.display_name.trim().is_empty() {
            return Err(RegistryError::invalid_input(
                "displayName",
                "display name must not be empty",
            ));
        }

        for validator in &self.validators {
            if !validator.kind.compatible_with(self.data_type) {
                return Err(RegistryError::invalid_input(
                    "validators",
                    &format!(
                        "validator {:?} is not compatible with data type {:?}",
                        validator.kind, self.data_type
                    ),
                ));
            }
        }

        if let Some(default) = &self.default_value {
            if !self.data_type.accepts(default) {
                return Err(RegistryError::invalid_input(
                    "defaultValue",
                    "default value does not match the property's data type",
                ));
            }

            for validator in &self.validators {
                if !validator.is_satisfied_by(default) {
                    return Err(RegistryError::invalid_input(
                        "defaultValue",
                        "default value does not satisfy one of the property's validators",
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValidatorKind;

    fn base_property() -> Property {
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
    fn valid_property_passes() {
        assert!(base_property().validate().is_ok());
    }

    #[test]
    fn uppercase_leading_name_rejected() {
        let mut property = base_property();
        property.name = "Email".to_string();
        assert!(property.validate().is_err());
    }

    #[test]
    fn incompatible_validator_rejected() {
        let mut property = base_property();
        property.data_type = DataType::Number;
        property.validators.push(Validator {
            kind: ValidatorKind::Pattern,
            value: serde_json::json!("^.+$"),
        });
        assert!(property.validate().is_err());
    }

    #[test]
    fn default_value_must_satisfy_validators() {
        let mut property = base_property();
        property.validators.push(Validator {
            kind: ValidatorKind::Pattern,
            value: serde_json::json!("^.+@.+$"),
        });
        property.default_value = Some(serde_json::json!("not-an-email"));
        assert!(property.validate().is_err());

        property.default_value = Some(serde_json::json!("a@b.com"));
        assert!(property.validate().is_ok());
    }
}
