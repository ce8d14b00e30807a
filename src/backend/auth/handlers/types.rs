/**
 * Authentication Handler Types
 *
 * This module defines the request and response bodies used by the account
 * handlers. Field names follow the JSON the frontend sends
 * (`verificationCode`, `newPassword`, `refresh_token`).
 */

use serde::{Deserialize, Serialize};

use crate::shared::UserProfile;

/// Registration request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RegisterRequest {
    /// 3-30 chars, starts with a letter, then letters, digits or `_`
    pub username: String,
    pub email: String,
    /// Hashed before storage, never logged
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
///
/// Carries both tokens and the caller's own profile.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    /// Access token (24 hours)
    pub token: String,
    /// Refresh token (7 days)
    pub refresh_token: String,
    pub user: UserProfile,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct VerifyRequest {
    pub email: String,
    #[serde(rename = "verificationCode")]
    pub verification_code: String,
}

/// Body of the resend and password-reset requests
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// `token` is `None` when the refresh token still has time left
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RefreshResponse {
    pub token: Option<String>,
    pub refreshed: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ResetPasswordRequest {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

/// Profile update; absent or empty fields are left unchanged
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}
