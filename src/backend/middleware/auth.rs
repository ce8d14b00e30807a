/**
 * Authentication Middleware
 *
 * This module provides the access guard for routes that require a logged-in
 * user. It extracts and verifies the access token from the `Authorization`
 * header and provides the user ID to handlers.
 *
 * The header may carry the raw token or `Bearer <token>`. A token is
 * accepted when it validates as an access token, its `jti` has not been
 * revoked by logout and its subject still has an account.
 *
 * # Usage
 *
 * - `auth_middleware` is layered onto protected routes and attaches an
 *   `AuthenticatedUser` to the request extensions
 * - `AuthUser` reads that extension inside a handler
 * - `MaybeAuthUser` runs the same checks itself and never rejects; handlers
 *   that serve anonymous callers use it
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::tokens::{Claims, TokenKind};
use crate::backend::codes::policy::is_revoked;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the access token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    /// Validated claims, kept for logout
    pub claims: Claims,
}

/// Pull the token out of the `Authorization` header
///
/// Accepts both `Bearer <token>` and a bare token. The scheme name is
/// case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("Bearer") => rest.trim(),
        _ if value.eq_ignore_ascii_case("Bearer") => "",
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

/// Validate the request's access token against the token service and the
/// revocation list
pub async fn authenticate(
    app_state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, BackendError> {
    let token = bearer_token(headers).ok_or_else(|| {
        tracing::warn!("Missing Authorization header");
        BackendError::auth("Authorization token not provided")
    })?;

    let claims = app_state
        .tokens
        .validate(token, TokenKind::Access)
        .map_err(|e| {
            tracing::warn!("Invalid token: {}", e);
            BackendError::from(e)
        })?;

    if is_revoked(app_state.codes.as_ref(), &claims.jti).await? {
        tracing::warn!("Revoked token presented for user {}", claims.sub);
        return Err(BackendError::auth("Token has been revoked"));
    }

    if app_state.users.find_by_id(claims.sub).await?.is_none() {
        tracing::warn!("Token subject {} no longer exists", claims.sub);
        return Err(BackendError::auth("User no longer exists"));
    }

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        claims,
    })
}

/// Authentication middleware
///
/// This middleware:
/// 1. Extracts the token from the Authorization header
/// 2. Verifies it as an access token
/// 3. Rejects it if it was revoked or its user was deleted
/// 4. Attaches user data to request extensions for use in handlers
///
/// Returns 401 if the token is missing, invalid, expired, revoked or belongs
/// to a deleted account.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = authenticate(&app_state, request.headers()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Axum extractor for the authenticated user
///
/// Only valid on routes behind `auth_middleware`.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::auth("Unauthorized")
            })?;

        Ok(AuthUser(user))
    }
}

/// Optional authentication: `Some` for a valid, unrevoked access token
#[derive(Clone, Debug)]
pub struct MaybeAuthUser(pub Option<AuthenticatedUser>);

impl MaybeAuthUser {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|user| user.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if bearer_token(&parts.headers).is_none() {
            return Ok(MaybeAuthUser(None));
        }

        match authenticate(state, &parts.headers).await {
            Ok(user) => Ok(MaybeAuthUser(Some(user))),
            Err(e) => {
                tracing::debug!("Treating caller as anonymous: {}", e);
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
