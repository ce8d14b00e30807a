//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Router assembly and middleware layers
//! └── api_routes.rs   - The `/api` route table
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sns_backend::backend::routes::create_router;
//!
//! let router = create_router(app_state);
//! axum::serve(listener, router).await?;
//! ```

/// Main router creation
pub mod router;

/// API endpoint table
pub mod api_routes;

pub use router::create_router;
