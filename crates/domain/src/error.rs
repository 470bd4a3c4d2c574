//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A raw record failed a required-field, type or range check.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("invalid field `{field}`: {reason}")]
pub struct ValidationError {
    /// Name of the offending field
    pub field: String,
    /// Why the value was rejected
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "required field is missing or empty")
    }
}

pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_field_and_reason() {
        let err = ValidationError::new("battery_health", "must be within 0-100, got 140");
        assert_eq!(
            err.to_string(),
            "invalid field `battery_health`: must be within 0-100, got 140"
        );
    }

    #[test]
    fn test_missing() {
        let err = ValidationError::missing("pilot_id");
        assert_eq!(err.field, "pilot_id");
        assert!(err.reason.contains("missing"));
    }
}
