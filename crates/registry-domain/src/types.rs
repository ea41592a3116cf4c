//! Shared scalar types used by the domain entities: data types, cardinality,
//! and validator records.

use serde::{Deserialize, Serialize};

/// The type a property's value must conform to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Date,
    DateTime,
    Array,
    Object,
    Reference,
}

impl DataType {
    /// Whether a JSON value is shape-compatible with this data type.
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        match self {
            DataType::String => value.is_string(),
            DataType::Number => value.is_number(),
            DataType::Boolean => value.is_boolean(),
            DataType::Date | DataType::DateTime => value.is_string(),
            DataType::Array => value.is_array(),
            DataType::Object => value.is_object(),
            DataType::Reference => value.is_string(),
        }
    }
}

/// Directionality and multiplicity of a LinkType.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

/// The kind of constraint a [`Validator`] expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidatorKind {
    MinLength,
    MaxLength,
    Pattern,
    Min,
    Max,
    Enum,
}

impl ValidatorKind {
    /// Data types a validator of this kind may legally be attached to.
    /// `Enum` applies to any data type (spec §9 open question), every other
    /// kind is restricted to the data types it makes sense for.
    pub fn compatible_with(&self, data_type: DataType) -> bool {
        match self {
            ValidatorKind::MinLength | ValidatorKind::MaxLength | ValidatorKind::Pattern => {
                matches!(data_type, DataType::String)
            }
            ValidatorKind::Min | ValidatorKind::Max => matches!(data_type, DataType::Number),
            ValidatorKind::Enum => true,
        }
    }
}

/// A single constraint attached to a [`crate::Property`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validator {
    pub kind: ValidatorKind,
    pub value: serde_json::Value,
}

impl Validator {
    /// Whether `value` satisfies this constraint. Assumes `compatible_with`
    /// has already been checked for the owning property's data type.
    pub fn is_satisfied_by(&self, value: &serde_json::Value) -> bool {
        match self.kind {
            ValidatorKind::MinLength => match (value.as_str(), self.value.as_u64()) {
                (Some(s), Some(min)) => s.chars().count() as u64 >= min,
                _ => false,
            },
            ValidatorKind::MaxLength => match (value.as_str(), self.value.as_u64()) {
                (Some(s), Some(max)) => s.chars().count() as u64 <= max,
                _ => false,
            },
            ValidatorKind::Pattern => match (value.as_str(), self.value.as_str()) {
                (Some(s), Some(pattern)) => regex::Regex::new(pattern)
                    .map(|re| re.is_match(s))
                    .unwrap_or(false),
                _ => false,
            },
            ValidatorKind::Min => match (value.as_f64(), self.value.as_f64()) {
                (Some(v), Some(min)) => v >= min,
                _ => false,
            },
            ValidatorKind::Max => match (value.as_f64(), self.value.as_f64()) {
                (Some(v), Some(max)) => v <= max,
                _ => false,
            },
            ValidatorKind::Enum => self
                .value
                .as_array()
                .map(|allowed| allowed.contains(value))
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_accepts_matching_shapes() {
        assert!(DataType::String.accepts(&serde_json::json!("hello")));
        assert!(!DataType::String.accepts(&serde_json::json!(1)));
        assert!(DataType::Number.accepts(&serde_json::json!(1.5)));
    }

    #[test]
    fn enum_validator_applies_to_any_data_type() {
        assert!(ValidatorKind::Enum.compatible_with(DataType::Number));
        assert!(ValidatorKind::Enum.compatible_with(DataType::Boolean));
    }

    #[test]
    fn pattern_validator_only_compatible_with_string() {
        assert!(ValidatorKind::Pattern.compatible_with(DataType::String));
        assert!(!ValidatorKind::Pattern.compatible_with(DataType::Number));
    }

    #[test]
    fn min_max_only_compatible_with_number() {
        assert!(ValidatorKind::Min.compatible_with(DataType::Number));
        assert!(!ValidatorKind::Min.compatible_with(DataType::String));
    }

    #[test]
    fn pattern_validator_matches_value() {
        let validator = Validator {
            kind: ValidatorKind::Pattern,
            value: serde_json::json!("^.+@.+$"),
        };
        assert!(validator.is_satisfied_by(&serde_json::json!("a@b.com")));
        assert!(!validator.is_satisfied_by(&serde_json::json!("not-an-email")));
    }
}
