//! Authentication Module
//!
//! Accounts, credentials and tokens.
//!
//! # Architecture
//!
//! - **`users`** - user rows and the `UserRepo` trait (Postgres-backed)
//! - **`tokens`** - HS256 access, refresh and reset tokens
//! - **`handlers`** - HTTP handlers for the account endpoints
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Access and refresh tokens are signed with distinct secrets
//! - Unknown email and wrong password both return 401 (no information leakage)
//! - Logged-out tokens are rejected until they expire

/// User data model and database operations
pub mod users;

/// Token issuing and validation
pub mod tokens;

/// HTTP handlers for account endpoints
pub mod handlers;

pub use tokens::{Claims, TokenError, TokenKind, TokenService};
pub use users::{PgUserRepo, User, UserRepo};
