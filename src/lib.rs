//! SNS Backend - Main Library
//!
//! A social-network API: account registration with emailed verification
//! codes, JWT login sessions, password reset, posts and follows.
//!
//! # Module Structure
//!
//! - **`shared`** - API views, validation rules and shared error types
//! - **`backend`** - Axum server, PostgreSQL/Redis/SMTP integrations (only
//!   compiled with the `ssr` feature)
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - the server and all of its dependencies
//!
//! # Usage
//!
//! ```rust,no_run
//! use sns_backend::backend::server::{create_app, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(Config::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
