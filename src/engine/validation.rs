//! Validation error types shared by the processor and the wizard.
//!
//! Errors carry the offending field id plus a human-readable message so the
//! host UI can highlight fields without parsing strings.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

/// Validation error with a field reference and an optional fix suggestion.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationError {
    /// The field that failed validation
    #[schema(example = "vin")]
    pub field: String,
    #[schema(example = "VIN (Vehicle Identification Number) is required")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Error for a required field with no usable value.
    pub fn missing_required(field: &str, label: &str) -> Self {
        Self::new(field, format!("{label} is required"))
            .with_suggestion(format!("Fill in {} before generating", label.to_lowercase()))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Format a list of validation errors as one aggregated message.
pub fn summarize(errors: &[ValidationError]) -> String {
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    format!("{} field(s) failed validation: {}", errors.len(), fields.join(", "))
}
