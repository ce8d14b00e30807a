/**
 * Password Reset Handlers
 *
 * - `POST /api/request-password-reset` - email a reset link
 * - `POST /api/reset-password` - set a new password with the link's token
 *
 * The reset token is a 10-minute JWT of kind `reset`. It is also stored under
 * the user's email key, and completion requires the presented token to equal
 * the stored one. Completion deletes the key, so each link works once and a
 * newer request invalidates older links.
 */

use axum::{extract::State, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{EmailRequest, ResetPasswordRequest};
use crate::backend::auth::tokens::{TokenKind, RESET_TOKEN_TTL};
use crate::backend::auth::users::UserUpdate;
use crate::backend::codes::policy::{code_key, reserve_resend};
use crate::backend::email::{password_reset_email, reset_link};
use crate::backend::error::{ApiJson, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::validation::validate_password;
use crate::shared::MessageResponse;

const INVALID_RESET_TOKEN: &str = "Invalid or expired reset token";

/// Request password reset handler
///
/// Shares the resend counter with verification-code resends.
///
/// # Errors
///
/// * `404 Not Found` - no user with this email
/// * `403 Forbidden` - account not activated
/// * `429 Too Many Requests` - resend cap reached
pub async fn request_password_reset(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<EmailRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let email = request.email.trim();
    let codes = app_state.codes.as_ref();

    let user = app_state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    if !user.is_active {
        tracing::warn!("Password reset requested for inactive account: {}", email);
        return Err(BackendError::forbidden("Account is not activated"));
    }

    if reserve_resend(codes, email).await?.is_none() {
        tracing::warn!("Password reset limit reached for {}", email);
        return Err(BackendError::rate_limited(
            "Too many reset requests. Please try again later.",
        ));
    }

    let token = app_state.tokens.issue(user.id, TokenKind::Reset)?;
    codes.set(&code_key(email), &token, RESET_TOKEN_TTL).await?;

    let link = reset_link(&app_state.config.app_url, &token);
    app_state
        .mailer
        .send(password_reset_email(email, &link))
        .await
        .map_err(|e| {
            tracing::error!("Failed to send password reset email to {}: {}", email, e);
            BackendError::from(e)
        })?;

    tracing::info!("Password reset link sent to {}", email);

    Ok(Json(MessageResponse::new("Password reset link sent")))
}

/// Reset password handler
///
/// # Errors
///
/// * `400 Bad Request` - new password too short
/// * `401 Unauthorized` - token invalid, expired, superseded or already used
/// * `404 Not Found` - the token's user no longer exists
pub async fn reset_password(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    validate_password(&request.new_password)?;

    let claims = app_state
        .tokens
        .validate(&request.token, TokenKind::Reset)
        .map_err(|e| {
            tracing::warn!("Rejected reset token: {}", e);
            BackendError::from(e)
        })?;

    let user = app_state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    let key = code_key(&user.email);
    let stored = app_state.codes.get(&key).await?;
    if stored.as_deref() != Some(request.token.as_str()) {
        tracing::warn!("Reset token already used or superseded for {}", user.email);
        return Err(BackendError::auth(INVALID_RESET_TOKEN));
    }

    let password_hash = hash(&request.new_password, app_state.config.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::from(e)
    })?;

    app_state
        .users
        .update(
            user.id,
            UserUpdate {
                password_hash: Some(password_hash),
                ..UserUpdate::default()
            },
        )
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    app_state.codes.del(&key).await?;

    tracing::info!("Password reset for {}", user.email);
    Ok(Json(MessageResponse::new("Password has been reset")))
}
