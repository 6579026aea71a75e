//! Error types for the gym administration core.
//!
//! All errors implement the standard [`std::error::Error`] trait via
//! [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Validation errors** ([`CoreError::Validation`]): field-level,
//!   user-correctable input problems (bad dates, credit overdraft). Carried
//!   as structured `{field, message}` pairs so the UI layer can attach each
//!   message to the form field that caused it.
//! - **Configuration errors** ([`CoreError::Configuration`]): malformed
//!   product definitions. Product validation prevents these from being
//!   stored, so hitting one at runtime means a corrupted record.
//! - **Not-found errors** ([`CoreError::NotFound`]): a referenced product,
//!   member, or subscription is missing from the store. Surfaced as-is;
//!   this is not a transient-failure domain, so there is no retry.
//!
//! Nothing here is fatal to the process. Every failure is scoped to the
//! single mutation attempt that produced it.
//!
//! # Examples
//!
//! ```
//! use gym_admin_core::error::{CoreError, Result, ValidationError};
//!
//! fn check_name(name: &str) -> Result<()> {
//!     if name.trim().is_empty() {
//!         return Err(ValidationError::single("name", "name is required").into());
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_name("  ").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for core operations.
///
/// This is a convenience type that uses [`CoreError`] as the error type.
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in the gym administration core.
///
/// All variants include contextual information about what went wrong.
/// The error messages are designed to be user-facing and actionable.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum CoreError {
    /// One or more fields failed validation.
    ///
    /// The wrapped [`ValidationError`] lists every failed field with its
    /// message, so the caller can highlight all problems at once instead of
    /// surfacing them one edit at a time.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A product definition is malformed.
    ///
    /// Product validation rejects bad duration policies before they are
    /// stored, so this error indicates a record that bypassed validation
    /// (for example, written by an older schema).
    #[error("invalid product configuration: {0}")]
    Configuration(String),

    /// A referenced entity does not exist in the store.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("product", "member", "subscription").
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },
}

impl CoreError {
    /// Builds a not-found error for the given entity kind and identifier.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }
}

/// A single failed field with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Form field that failed (e.g. `start_date`, `credits_used`).
    pub field: String,
    /// User-facing message describing the problem.
    pub message: String,
}

/// Field-level validation failure.
///
/// Collects every failed field so a form can display all problems in one
/// pass. Use [`ValidationError::single`] for a one-field rejection or the
/// validator's accumulator for multi-field checks.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("validation failed: {}", format_fields(.fields))]
pub struct ValidationError {
    /// Failed fields, in the order they were checked.
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    /// Creates a validation error for a single field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            fields: vec![FieldError { field: field.into(), message: message.into() }],
        }
    }

    /// Returns the message recorded for `field`, if that field failed.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.field == field).map(|f| f.message.as_str())
    }
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::single("start_date", "start date is required");
        assert_eq!(error.to_string(), "validation failed: start_date: start date is required");
    }

    #[test]
    fn test_validation_error_message_for() {
        let error = ValidationError::single("price", "price cannot be negative");
        assert_eq!(error.message_for("price"), Some("price cannot be negative"));
        assert_eq!(error.message_for("name"), None);
    }

    #[test]
    fn test_not_found_display() {
        let error = CoreError::not_found("product", "prod-123");
        assert_eq!(error.to_string(), "product not found: prod-123");
    }

    #[test]
    fn test_configuration_display() {
        let error = CoreError::Configuration("credit policy without allotment".to_owned());
        assert!(error.to_string().contains("invalid product configuration"));
    }

    #[test]
    fn test_validation_error_converts_to_core_error() {
        let error: CoreError = ValidationError::single("end_date", "bad").into();
        assert!(matches!(error, CoreError::Validation(_)));
    }

    #[test]
    fn test_field_error_serialization() {
        let error = FieldError {
            field: "credits_used".to_owned(),
            message: "credits used cannot exceed credits included".to_owned(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"field\":\"credits_used\""));
    }

    #[test]
    fn test_multi_field_display_joins_with_semicolon() {
        let error = ValidationError {
            fields: vec![
                FieldError { field: "a".to_owned(), message: "one".to_owned() },
                FieldError { field: "b".to_owned(), message: "two".to_owned() },
            ],
        };
        assert_eq!(error.to_string(), "validation failed: a: one; b: two");
    }
}
