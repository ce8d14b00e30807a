//! Backend Module
//!
//! All server-side code: an Axum HTTP API over PostgreSQL (accounts, posts,
//! follows), Redis (verification codes, resend counters, revoked tokens) and
//! SMTP (verification and reset emails).
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - configuration, start-up and application state
//! - **`routes`** - route table and router layers
//! - **`auth`** - users, tokens and the account handlers
//! - **`posts`** - post storage and handlers
//! - **`follows`** - follow edges and handlers
//! - **`codes`** - ephemeral code store and its key/TTL policy
//! - **`email`** - outbound mail
//! - **`middleware`** - access guard
//! - **`error`** - HTTP-facing error type
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs
//! ├── main.rs         - `sns-server` binary
//! ├── server/         - Config, init, AppState
//! ├── routes/         - Router assembly
//! ├── auth/           - Users, tokens, account handlers
//! ├── posts/          - Posts
//! ├── follows/        - Follows
//! ├── codes/          - Redis code store
//! ├── email/          - SMTP mailer
//! ├── middleware/     - Access guard
//! └── error/          - BackendError
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. Every error becomes a JSON
//! body `{"error": ..., "status": ...}`; dependency failures are logged and
//! reported to the client as a generic 500.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Posts
pub mod posts;

/// Follow relationships
pub mod follows;

/// Verification codes, resend counters and token revocation
pub mod codes;

/// Outbound email
pub mod email;

/// Middleware for request processing
pub mod middleware;

/// In-memory stores for tests
#[cfg(test)]
pub mod testing;

pub use error::BackendError;
pub use server::{create_app, AppState, Config};
