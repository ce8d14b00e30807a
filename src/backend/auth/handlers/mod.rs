//! Account Handlers Module
//!
//! HTTP handlers for registration, verification, login, sessions, password
//! reset and profiles.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs            - Module exports
//! ├── types.rs          - Request/response bodies
//! ├── register.rs       - POST /api/register
//! ├── verification.rs   - POST /api/verify, /api/resend-verification-code
//! ├── login.rs          - POST /api/login
//! ├── session.rs        - POST /api/refresh-token, /api/logout
//! ├── password_reset.rs - POST /api/request-password-reset, /api/reset-password
//! └── profile.rs        - /api/getuser, /api/user
//! ```
//!
//! # Account Lifecycle
//!
//! 1. **Register**: user created inactive → 4-digit code emailed
//! 2. **Verify**: code matches → account active
//! 3. **Login**: credentials checked → access + refresh tokens returned
//! 4. **Logout**: access token revoked until its expiry

/// Request and response types
pub mod types;

pub mod register;
pub mod verification;
pub mod login;
pub mod session;
pub mod password_reset;
pub mod profile;

pub use login::login;
pub use password_reset::{request_password_reset, reset_password};
pub use profile::{delete_user, get_auth_user, get_user, update_user};
pub use register::register;
pub use session::{logout, refresh_token};
pub use verification::{resend_verification_code, verify};
