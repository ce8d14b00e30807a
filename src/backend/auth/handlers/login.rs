/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Refuse accounts that were never activated
 * 4. Issue an access token and a refresh token
 *
 * # Security
 *
 * - Unknown email and wrong password both return 401 with the same message
 * - Passwords and tokens are never logged
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse};
use crate::backend::auth::tokens::TokenKind;
use crate::backend::error::{ApiJson, BackendError};
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - unknown email or wrong password
/// * `403 Forbidden` - account not yet activated
/// * `500 Internal Server Error` - database, bcrypt or signing failure
///
/// # Example Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "refresh_token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "user": { "id": "...", "username": "alice", "email": "alice@example.com", ... }
/// }
/// ```
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, BackendError> {
    let email = request.email.trim();
    tracing::info!("Login request for: {}", email);

    let user = app_state.users.find_by_email(email).await?.ok_or_else(|| {
        tracing::warn!("User not found: {}", email);
        BackendError::auth(INVALID_CREDENTIALS)
    })?;

    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::from(e)
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", email);
        return Err(BackendError::auth(INVALID_CREDENTIALS));
    }

    if !user.is_active {
        tracing::warn!("Login attempt on inactive account: {}", email);
        return Err(BackendError::forbidden(
            "Account is not activated. Please verify your email or request a new code.",
        ));
    }

    let token = app_state.tokens.issue(user.id, TokenKind::Access)?;
    let refresh_token = app_state.tokens.issue(user.id, TokenKind::Refresh)?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok(Json(LoginResponse {
        token,
        refresh_token,
        user: user.profile(),
    }))
}
