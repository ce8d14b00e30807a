//! Server Module
//!
//! This module contains the code that wires the HTTP server together.
//!
//! # Architecture
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - `Config` loaded from the environment
//! - **`init`** - dependency connection, migrations and app creation
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `Config::from_env()` (fatal on error)
//! 2. **Dependencies**: PostgreSQL (+ migrations), Redis, SMTP
//! 3. **State Creation**: `AppState::new`
//! 4. **Router Creation**: all routes plus CORS, tracing and language layers
//!
//! # Example
//!
//! ```rust,no_run
//! use sns_backend::backend::server::{config::Config, create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::Config;
pub use init::{create_app, StartupError};
pub use state::AppState;
