//! Shared Error Types
//!
//! Errors produced by code that has no server dependencies, such as input
//! validation. The backend converts these into HTTP responses
//! (`BackendError::from`).
//!
//! # Usage
//!
//! ```rust
//! use sns_backend::shared::error::SharedError;
//!
//! let error = SharedError::validation("username", "Username must be 3-30 characters");
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The client-facing message, without the field prefix
    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. } => message,
        }
    }
}
