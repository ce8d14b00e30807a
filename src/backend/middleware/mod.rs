//! Middleware Module
//!
//! Request-pipeline pieces that run before handlers.
//!
//! - **`auth`** - access guard for protected routes and the `AuthUser` /
//!   `MaybeAuthUser` extractors
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware;
//! use sns_backend::backend::middleware::auth_middleware;
//!
//! let protected = Router::new()
//!     .route("/api/logout", post(logout))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser, MaybeAuthUser};
