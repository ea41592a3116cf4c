//! Validation rules for common data types
//!
//! This module provides validation functions for emails, schema
//! identifiers, and other common input types.

use once_cell::sync::Lazy;
use regex::Regex;
use std::result::Result as StdResult;

/// Error type for validation operations
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Input too long: {0} characters (max {1})")]
    TooLong(usize, usize),

    #[error("Input too short: {0} characters (min {1})")]
    TooShort(usize, usize),

    #[error("Invalid characters: {0}")]
    InvalidCharacters(String),
}

/// Result type for validation operations
pub type Result<T> = StdResult<T, ValidationError>;

// Email validation regex (RFC 5322 compliant)
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

// Schema identifier regex: ObjectType/LinkType/property names
static IDENTIFIER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap()
});

/// Validate email address format
pub fn validate_email(email: &str) -> Result<()> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail("Email cannot be empty".to_string()));
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong(email.len(), 254));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(format!("Invalid email format: {}", email)));
    }

    Ok(())
}

/// Validate a schema identifier (ObjectType, LinkType, or property name).
///
/// Must start with a letter and contain only letters, digits, and
/// underscores, per the registry's naming invariant.
///
/// # Example
/// ```rust
/// use registry_validation::validate_identifier;
///
/// assert!(validate_identifier("Customer").is_ok());
/// assert!(validate_identifier("customer_id").is_ok());
/// assert!(validate_identifier("2ndCustomer").is_err());
/// assert!(validate_identifier("customer-id").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ValidationError::InvalidIdentifier("identifier cannot be empty".to_string()));
    }

    if name.len() > 128 {
        return Err(ValidationError::TooLong(name.len(), 128));
    }

    if !IDENTIFIER_REGEX.is_match(name) {
        return Err(ValidationError::InvalidIdentifier(format!(
            "'{}' must match ^[A-Za-z][A-Za-z0-9_]*$",
            name
        )));
    }

    Ok(())
}

/// Validate input length
pub fn validate_length(input: &str, min_len: usize, max_len: usize) -> Result<()> {
    if input.len() < min_len {
        return Err(ValidationError::TooShort(input.len(), min_len));
    }

    if input.len() > max_len {
        return Err(ValidationError::TooLong(input.len(), max_len));
    }

    Ok(())
}

/// Validate that input contains only alphanumeric characters and spaces
pub fn validate_alphanumeric_with_spaces(input: &str) -> Result<()> {
    if input.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        return Err(ValidationError::InvalidCharacters("Only alphanumeric characters and spaces allowed".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("test.email+tag@domain.co.uk").is_ok());
        assert!(validate_email("user@localhost").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid-email").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("@domain.com").is_err());
    }

    #[test]
    fn test_validate_identifier_valid() {
        assert!(validate_identifier("Customer").is_ok());
        assert!(validate_identifier("customer_id").is_ok());
        assert!(validate_identifier("A1").is_ok());
    }

    #[test]
    fn test_validate_identifier_invalid() {
        assert!(validate_identifier("").is_err()); // empty
        assert!(validate_identifier("2ndCustomer").is_err()); // starts with digit
        assert!(validate_identifier("customer-id").is_err()); // hyphen not allowed
        assert!(validate_identifier("customer id").is_err()); // space not allowed
        assert!(validate_identifier(&"a".repeat(129)).is_err()); // too long
    }

    #[test]
    fn test_validate_length() {
        assert!(validate_length("hello", 3, 10).is_ok());
        assert!(validate_length("hi", 3, 10).is_err()); // Too short
        assert!(validate_length("this is a very long string", 3, 10).is_err()); // Too long
    }

    #[test]
    fn test_validate_alphanumeric_with_spaces() {
        assert!(validate_alphanumeric_with_spaces("Hello World 123").is_ok());
        assert!(validate_alphanumeric_with_spaces("Hello@World").is_err()); // Invalid character
    }
}
