//! Physical name validation
//!
//! Library references and member names end up verbatim in generated code,
//! so they are checked before a table location is handed to a generator
//!
//! # Rules
//!
//! - Library references: 1 to 8 characters
//! - Member names: 1 to 32 characters
//! - Letters, digits and underscores only; must not start with a digit

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// Maximum length of a library reference
pub const MAX_LIBREF_LENGTH: usize = 8;

/// Maximum length of a member name
pub const MAX_MEMBER_NAME_LENGTH: usize = 32;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name pattern"));

/// Errors that can occur during name validation
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum ValidationError {
    /// Name is empty
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Name exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Name contains characters outside the allowed set
    #[error("{field} '{value}' must start with a letter or underscore and contain only letters, digits and underscores")]
    InvalidCharacters { field: &'static str, value: String },
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a library reference
///
/// # Examples
///
/// ```
/// use transform_codegen::validation::names::validate_libref;
///
/// assert!(validate_libref("WORK").is_ok());
/// assert!(validate_libref("STAGING01").is_err());
/// assert!(validate_libref("1LIB").is_err());
/// ```
pub fn validate_libref(libref: &str) -> ValidationResult<()> {
    validate_name("libref", libref, MAX_LIBREF_LENGTH)
}

/// Validate a member (dataset) name
///
/// # Examples
///
/// ```
/// use transform_codegen::validation::names::validate_member_name;
///
/// assert!(validate_member_name("CUSTOMER_ORDERS").is_ok());
/// assert!(validate_member_name("customer-orders").is_err());
/// ```
pub fn validate_member_name(name: &str) -> ValidationResult<()> {
    validate_name("member name", name, MAX_MEMBER_NAME_LENGTH)
}

fn validate_name(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }

    if value.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            actual: value.len(),
        });
    }

    if !NAME_PATTERN.is_match(value) {
        return Err(ValidationError::InvalidCharacters {
            field,
            value: value.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_libref_length_limit() {
        assert!(validate_libref("ABCDEFGH").is_ok());
        assert!(matches!(
            validate_libref("ABCDEFGHI"),
            Err(ValidationError::TooLong { max: 8, actual: 9, .. })
        ));
    }

    #[test]
    fn test_member_name_length_limit() {
        assert!(validate_member_name(&"a".repeat(32)).is_ok());
        assert!(matches!(
            validate_member_name(&"a".repeat(33)),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_empty_names() {
        assert_eq!(validate_libref(""), Err(ValidationError::Empty("libref")));
        assert_eq!(
            validate_member_name(""),
            Err(ValidationError::Empty("member name"))
        );
    }

    #[test]
    fn test_invalid_characters() {
        assert!(validate_member_name("_TEMP").is_ok());
        assert!(matches!(
            validate_member_name("9LIVES"),
            Err(ValidationError::InvalidCharacters { .. })
        ));
        assert!(matches!(
            validate_member_name("my table"),
            Err(ValidationError::InvalidCharacters { .. })
        ));
    }
}
