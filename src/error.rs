//! Custom error types for process-audit
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for process-audit operations
#[derive(Error, Debug)]
pub enum AuditError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Validation errors without a specific step attached
    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation errors located on a workflow step
    #[error("Validation error in step '{step_key}': {message}")]
    StepValidation { step_key: String, message: String },

    /// A step transition breaks a workflow business rule
    #[error("Business rule violation in step '{step_key}': {message}")]
    BusinessRule { step_key: String, message: String },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl AuditError {
    /// Create a validation error located on a step
    pub fn invalid_step(step_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StepValidation {
            step_key: step_key.into(),
            message: message.into(),
        }
    }

    /// Create a business rule violation located on a step
    pub fn business_rule(step_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRule {
            step_key: step_key.into(),
            message: message.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::StepValidation { .. })
    }

    /// Check if this is a business rule violation
    pub fn is_business_rule(&self) -> bool {
        matches!(self, Self::BusinessRule { .. })
    }

    /// The step this error is located on, if any
    pub fn step_key(&self) -> Option<&str> {
        match self {
            Self::StepValidation { step_key, .. } | Self::BusinessRule { step_key, .. } => {
                Some(step_key)
            }
            _ => None,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for AuditError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for AuditError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for process-audit operations
pub type AuditResult<T> = Result<T, AuditError>;
