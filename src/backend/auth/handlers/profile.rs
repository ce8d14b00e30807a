/**
 * Profile Handlers
 *
 * - `GET /api/getuser` - the caller's own profile
 * - `GET /api/user/{id}` - any user's profile; the email is shown only to its owner
 * - `PUT /api/user` - change email, password, bio or image URL
 * - `DELETE /api/user` - delete the caller's account
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use bcrypt::hash;
use uuid::Uuid;

use crate::backend::auth::handlers::types::UpdateUserRequest;
use crate::backend::auth::users::UserUpdate;
use crate::backend::codes::policy::revoke_token;
use crate::backend::error::{ApiJson, BackendError};
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::server::state::AppState;
use crate::shared::validation::{validate_email, validate_password, validate_profile_field};
use crate::shared::{MessageResponse, ProfileView, UserProfile};

fn user_not_found() -> BackendError {
    BackendError::not_found("User not found")
}

/// Blank strings count as "not provided"
fn provided(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get authenticated user handler
pub async fn get_auth_user(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<UserProfile>, BackendError> {
    let user = app_state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Authenticated user {} no longer exists", auth.user_id);
            user_not_found()
        })?;

    Ok(Json(user.profile()))
}

/// Get user handler
///
/// Callers presenting the user's own access token get `UserProfile`; everyone
/// else, including anonymous callers, gets `PublicProfile`.
pub async fn get_user(
    State(app_state): State<AppState>,
    caller: MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileView>, BackendError> {
    let user = app_state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(user_not_found)?;

    let view = if caller.user_id() == Some(user.id) {
        ProfileView::Owner(user.profile())
    } else {
        ProfileView::Public(user.public_profile())
    };
    Ok(Json(view))
}

/// Update user handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid email, short password or an overlong field
/// * `404 Not Found` - the caller's account no longer exists
/// * `409 Conflict` - email belongs to another account
pub async fn update_user(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserProfile>, BackendError> {
    let email = provided(request.email);
    if let Some(email) = &email {
        validate_email(email)?;
    }

    let password_hash = match provided(request.password) {
        Some(password) => {
            validate_password(&password)?;
            let hashed = hash(&password, app_state.config.bcrypt_cost).map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                BackendError::from(e)
            })?;
            Some(hashed)
        }
        None => None,
    };

    let bio = provided(request.bio);
    if let Some(bio) = &bio {
        validate_profile_field("bio", bio)?;
    }
    let profile_image_url = provided(request.profile_image_url);
    if let Some(url) = &profile_image_url {
        validate_profile_field("profile_image_url", url)?;
    }

    let update = UserUpdate {
        email,
        password_hash,
        bio,
        profile_image_url,
    };

    let user = app_state
        .users
        .update(auth.user_id, update)
        .await
        .map_err(|e| {
            tracing::warn!("Failed to update user {}: {}", auth.user_id, e);
            BackendError::from(e)
        })?
        .ok_or_else(user_not_found)?;

    tracing::info!("User updated: {}", user.id);
    Ok(Json(user.profile()))
}

/// Delete user handler
///
/// The caller's posts stay, detached from any author. Follow edges go with
/// the account. The token used for the request is revoked.
pub async fn delete_user(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
) -> Result<Json<MessageResponse>, BackendError> {
    if !app_state.users.delete(auth.user_id).await? {
        return Err(user_not_found());
    }
    revoke_token(app_state.codes.as_ref(), &auth.claims).await?;

    tracing::info!("User deleted: {}", auth.user_id);
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
