//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and can be converted to HTTP responses.
//!
//! # Architecture
//!
//! - **`types`** - `BackendError` and `RepoError` definitions and constructors
//! - **`conversion`** - `IntoResponse`, `From` impls for collaborator errors,
//!   and the `ApiJson` body extractor
//!
//! # Example
//!
//! ```rust,no_run
//! use sns_backend::backend::error::BackendError;
//!
//! async fn handler() -> Result<String, BackendError> {
//!     Err(BackendError::not_found("User not found"))
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use conversion::ApiJson;
pub use types::{BackendError, RepoError};
