//! # Registry Validation
//!
//! Shared input validation and sanitization utilities for the schema
//! registry's domain and service crates.
//!
//! ## Features
//!
//! - Schema identifier validation (`ObjectType`/`LinkType`/property names)
//! - Input sanitization for free-text fields
//! - Security-pattern scanning for untrusted input
//!
//! ## Example
//!
//! ```rust
//! use registry_validation::{validate_identifier, sanitize_html};
//!
//! // Validate a schema identifier
//! assert!(validate_identifier("Customer").is_ok());
//!
//! // Sanitize HTML input
//! let clean = sanitize_html("<script>alert('xss')</script>Hello");
//! assert_eq!(clean, "Hello");
//! ```

pub mod rules;
pub mod sanitization;
pub mod validation;

// Re-export main functions
pub use rules::{validate_email, validate_identifier};
pub use sanitization::{sanitize_html, sanitize_sql_input, sanitize_filename, trim_and_normalize};
pub use validation::types::{
    AdvancedValidator, ValidationConfig, ValidationContext, ValidationRule, ValidationSeverity,
};
