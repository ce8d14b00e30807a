/**
 * Session Handlers
 *
 * - `POST /api/refresh-token` - trade a nearly expired refresh token for a new
 *   access token
 * - `POST /api/logout` - revoke the presented access token
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{RefreshRequest, RefreshResponse};
use crate::backend::auth::tokens::TokenService;
use crate::backend::codes::policy::revoke_token;
use crate::backend::codes::CodeStore;
use crate::backend::error::{ApiJson, BackendError};
use crate::backend::middleware::AuthUser;
use crate::shared::MessageResponse;

/// Refresh token handler
///
/// Returns `{"token": null, "refreshed": false}` while the refresh token has
/// 30 seconds or more left.
///
/// # Errors
///
/// * `401 Unauthorized` - not a valid refresh token
pub async fn refresh_token(
    State(tokens): State<TokenService>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>, BackendError> {
    let token = tokens.refresh(&request.refresh_token).map_err(|e| {
        tracing::warn!("Refresh rejected: {}", e);
        BackendError::from(e)
    })?;

    let refreshed = token.is_some();
    if refreshed {
        tracing::info!("Access token re-issued from refresh token");
    }

    Ok(Json(RefreshResponse { token, refreshed }))
}

/// Logout handler
///
/// The token stays revoked until it would have expired anyway.
pub async fn logout(
    State(codes): State<Arc<dyn CodeStore>>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, BackendError> {
    revoke_token(codes.as_ref(), &user.claims).await?;

    tracing::info!("User logged out: {}", user.user_id);
    Ok(Json(MessageResponse::new("Logged out successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::auth::tokens::TokenKind;
    use crate::backend::codes::policy::is_revoked;
    use crate::backend::middleware::AuthenticatedUser;
    use crate::backend::testing::test_state;
    use axum::http::StatusCode;
    use std::time::Duration;
    use uuid::Uuid;

    fn refresh_request(token: &str) -> RefreshRequest {
        RefreshRequest {
            refresh_token: token.to_string(),
        }
    }

    #[tokio::test]
    async fn test_fresh_refresh_token_is_not_reissued() {
        let state = test_state();
        let refresh = state.tokens.issue(Uuid::new_v4(), TokenKind::Refresh).unwrap();

        let Json(response) = refresh_token(State(state.tokens.clone()), ApiJson(refresh_request(&refresh)))
            .await
            .unwrap();
        assert_eq!(
            response,
            RefreshResponse {
                token: None,
                refreshed: false
            }
        );
    }

    #[tokio::test]
    async fn test_expiring_refresh_token_is_reissued() {
        let state = test_state();
        let user_id = Uuid::new_v4();
        let refresh = state
            .tokens
            .issue_with_ttl(user_id, TokenKind::Refresh, Duration::from_secs(5))
            .unwrap();

        let Json(response) = refresh_token(State(state.tokens.clone()), ApiJson(refresh_request(&refresh)))
            .await
            .unwrap();

        assert!(response.refreshed);
        let access = response.token.unwrap();
        let claims = state.tokens.validate(&access, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[tokio::test]
    async fn test_access_token_cannot_refresh() {
        let state = test_state();
        let access = state.tokens.issue(Uuid::new_v4(), TokenKind::Access).unwrap();

        let err = refresh_token(State(state.tokens.clone()), ApiJson(refresh_request(&access)))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_revokes_jti() {
        let state = test_state();
        let token = state.tokens.issue(Uuid::new_v4(), TokenKind::Access).unwrap();
        let claims = state.tokens.validate(&token, TokenKind::Access).unwrap();
        let user = AuthenticatedUser {
            user_id: claims.sub,
            claims: claims.clone(),
        };

        logout(State(state.codes.clone()), AuthUser(user)).await.unwrap();

        assert!(is_revoked(state.codes.as_ref(), &claims.jti).await.unwrap());
    }
}
