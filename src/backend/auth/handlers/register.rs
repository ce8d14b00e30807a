/**
 * Registration Handler
 *
 * This module implements the user registration handler for POST /api/register.
 *
 * # Registration Process
 *
 * 1. Validate username, email and password
 * 2. Hash password using bcrypt
 * 3. Create an inactive user (409 if email or username is taken)
 * 4. Store a 4-digit verification code for 10 minutes
 * 5. Email the code
 *
 * No step is rolled back if a later one fails. A user whose code was never
 * delivered can ask for another through `/api/resend-verification-code`.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::types::RegisterRequest;
use crate::backend::auth::users::NewUser;
use crate::backend::codes::policy::issue_verification_code;
use crate::backend::email::verification_email;
use crate::backend::error::{ApiJson, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::validation::{validate_email, validate_password, validate_username};
use crate::shared::MessageResponse;

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username, email or password
/// * `409 Conflict` - email or username already registered
/// * `500 Internal Server Error` - hashing, database, cache or mail failure
///
/// # Example Request
///
/// ```http
/// POST /api/register HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "securepassword123"
/// }
/// ```
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), BackendError> {
    let email = request.email.trim().to_string();
    tracing::info!("Register request for username: {}, email: {}", request.username, email);

    validate_username(&request.username)?;
    validate_email(&email)?;
    validate_password(&request.password)?;

    let password_hash = hash(&request.password, app_state.config.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::from(e)
    })?;

    let user = app_state
        .users
        .create(NewUser {
            username: request.username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            tracing::warn!("Failed to create user: {}", e);
            BackendError::from(e)
        })?;

    let code = issue_verification_code(app_state.codes.as_ref(), &user.email).await?;
    app_state
        .mailer
        .send(verification_email(&user.email, &code))
        .await
        .map_err(|e| {
            tracing::error!("Failed to send verification code to {}: {}", user.email, e);
            BackendError::from(e)
        })?;

    tracing::info!("User registered: {} ({})", user.username, user.email);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(
            "Registration successful. A verification code has been sent to your email.",
        )),
    ))
}
