//! Error types for request validation

use thiserror::Error;

/// Validation errors raised before a request leaves the client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::RequiredFieldMissing {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::RequiredFieldMissing { field } | Self::InvalidValue { field, .. } => field,
        }
    }
}

/// Result type alias for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_display() {
        let err = ValidationError::required("Project name");
        assert_eq!(err.to_string(), "Project name is required");
        assert_eq!(err.field(), "Project name");
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ValidationError::invalid("email", "must contain '@'");
        assert!(err.to_string().contains("Invalid value for email"));
    }
}
