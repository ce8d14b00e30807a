//! Shared Module
//!
//! Types with no server dependencies: the JSON views returned by the API,
//! input validation rules and the error type they produce. Everything here
//! compiles without the `ssr` feature so API clients can reuse it.

/// Shared error types
pub mod error;

/// Request body validation rules
pub mod validation;

/// Client-facing response views
pub mod views;

pub use error::SharedError;
pub use views::{FollowView, MessageResponse, PostView, ProfileView, PublicProfile, UserProfile};
