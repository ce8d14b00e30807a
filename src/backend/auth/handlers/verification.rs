/**
 * Email Verification Handlers
 *
 * - `POST /api/verify` - confirm the emailed code and activate the account
 * - `POST /api/resend-verification-code` - send a fresh code
 *
 * Resends share one counter per email (`resend_count_<email>`) with
 * password-reset requests. Once it reaches 3 within its 12-hour rolling
 * window, further requests get 429.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{EmailRequest, VerifyRequest};
use crate::backend::codes::policy::{
    clear_verification, code_matches, issue_verification_code, reserve_resend,
};
use crate::backend::email::verification_email;
use crate::backend::error::{ApiJson, BackendError};
use crate::backend::server::state::AppState;
use crate::shared::MessageResponse;

/// Verify handler
///
/// The code is checked before the user is looked up, so a wrong code for an
/// unknown email is 401, not 404.
///
/// # Errors
///
/// * `401 Unauthorized` - no code stored (expired or never issued) or mismatch
/// * `404 Not Found` - code matched but the user no longer exists
pub async fn verify(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<VerifyRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let email = request.email.trim();
    let codes = app_state.codes.as_ref();

    if !code_matches(codes, email, request.verification_code.trim()).await? {
        tracing::warn!("Invalid or expired verification code for {}", email);
        return Err(BackendError::auth("Invalid or expired verification code"));
    }

    let user = app_state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    app_state.users.activate(user.id).await?;
    clear_verification(codes, email).await?;

    tracing::info!("User verified: {} ({})", user.username, email);
    Ok(Json(MessageResponse::new("Email verified successfully")))
}

/// Resend verification code handler
///
/// # Errors
///
/// * `404 Not Found` - no user with this email
/// * `409 Conflict` - account already active
/// * `429 Too Many Requests` - resend cap reached
pub async fn resend_verification_code(
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

    if user.is_active {
        tracing::warn!("Resend requested for active account: {}", email);
        return Err(BackendError::conflict("Account is already activated"));
    }

    let Some(attempt) = reserve_resend(codes, email).await? else {
        tracing::warn!("Resend limit reached for {}", email);
        return Err(BackendError::rate_limited(
            "Resend limit reached. Please try again later.",
        ));
    };

    let code = issue_verification_code(codes, email).await?;
    app_state
        .mailer
        .send(verification_email(email, &code))
        .await
        .map_err(|e| {
            tracing::error!("Failed to send verification code to {}: {}", email, e);
            BackendError::from(e)
        })?;

    tracing::info!("Verification code resent to {} (attempt {})", email, attempt);

    Ok(Json(MessageResponse::new("Verification code resent")))
}
