//! # Registry Domain
//!
//! Pure validation and transition logic for the schema registry's entities:
//! no I/O, no storage, no caching. `ObjectType`, `Property`, and `LinkType`
//! carry their own `validate()`; version bumping and snapshot diffing live
//! here too since they're pure functions of entity state.
//!
//! ## Example
//!
//! ```rust
//! use registry_domain::{DataType, ObjectType, Property};
//! use uuid::Uuid;
//!
//! let mut object_type = ObjectType::new("Customer", "Customer", "alice");
//! object_type.add_property(Property {
//!     id: Uuid::new_v4(),
//!     name: "email".to_string(),
//!     display_name: "Email".to_string(),
//!     data_type: DataType::String,
//!     required: true,
//!     unique: false,
//!     indexed: false,
//!     default_value: None,
//!     validators: vec![],
//! }).unwrap();
//!
//! assert!(object_type.validate().is_ok());
//! ```

pub mod link_type;
pub mod object_type;
pub mod property;
pub mod types;
pub mod version;

pub use link_type::LinkType;
pub use object_type::ObjectType;
pub use property::Property;
pub use types::{Cardinality, DataType, Validator, ValidatorKind};
pub use version::{diff_snapshots, ChangeType, DiffEntry, VersionSnapshot};
