/**
 * Follow Handlers
 *
 * - `POST /api/follow` - follow a user
 * - `POST /api/unfollow` - stop following a user
 * - `GET /api/user/{id}/followers` - edges pointing at a user
 * - `GET /api/user/{id}/following` - edges leaving a user
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::{ApiJson, BackendError};
use crate::backend::follows::db::Follow;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{FollowView, MessageResponse};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FollowRequest {
    pub followed_id: Uuid,
}

/// Follow handler
///
/// # Errors
///
/// * `400 Bad Request` - following yourself
/// * `404 Not Found` - target user does not exist
/// * `409 Conflict` - already following
pub async fn follow_user(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<FollowRequest>,
) -> Result<(StatusCode, Json<FollowView>), BackendError> {
    let follower_id = auth.user_id;
    let followed_id = request.followed_id;

    if follower_id == followed_id {
        return Err(BackendError::validation("You cannot follow yourself"));
    }

    if app_state.users.find_by_id(followed_id).await?.is_none() {
        return Err(BackendError::not_found("User not found"));
    }

    if app_state.follows.exists(follower_id, followed_id).await? {
        tracing::warn!("{} already follows {}", follower_id, followed_id);
        return Err(BackendError::conflict("Already following this user"));
    }

    let follow = app_state.follows.create(follower_id, followed_id).await?;

    tracing::info!("{} followed {}", follower_id, followed_id);
    Ok((StatusCode::CREATED, Json(follow.view())))
}

/// Unfollow handler
///
/// Succeeds whether or not an edge existed.
pub async fn unfollow_user(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    ApiJson(request): ApiJson<FollowRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let removed = app_state
        .follows
        .delete(auth.user_id, request.followed_id)
        .await?;

    tracing::info!("{} unfollowed {} ({} edges)", auth.user_id, request.followed_id, removed);
    Ok(Json(MessageResponse::new("User unfollowed successfully")))
}

pub async fn get_followers(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<FollowView>>, BackendError> {
    let follows = app_state.follows.followers(user_id).await?;
    Ok(Json(follows.iter().map(Follow::view).collect()))
}

pub async fn get_following(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<FollowView>>, BackendError> {
    let follows = app_state.follows.following(user_id).await?;
    Ok(Json(follows.iter().map(Follow::view).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::{authenticated, seed_user, test_state};

    fn follow_request(followed_id: Uuid) -> ApiJson<FollowRequest> {
        ApiJson(FollowRequest { followed_id })
    }

    #[tokio::test]
    async fn test_follow_then_unfollow_leaves_no_edge() {
        let state = test_state();
        let alice = seed_user(&state, "alice", "password123", true).await;
        let bob = seed_user(&state, "bob", "password123", true).await;

        let (status, Json(edge)) = follow_user(
            State(state.clone()),
            AuthUser(authenticated(&state, alice.id)),
            follow_request(bob.id),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!((edge.follower_id, edge.followed_id), (alice.id, bob.id));

        let Json(followers) = get_followers(State(state.clone()), Path(bob.id)).await.unwrap();
        assert_eq!(followers.len(), 1);
        let Json(following) = get_following(State(state.clone()), Path(alice.id)).await.unwrap();
        assert_eq!(following.len(), 1);

        unfollow_user(
            State(state.clone()),
            AuthUser(authenticated(&state, alice.id)),
            follow_request(bob.id),
        )
        .await
        .unwrap();

        assert!(!state.follows.exists(alice.id, bob.id).await.unwrap());
        let Json(followers) = get_followers(State(state), Path(bob.id)).await.unwrap();
        assert!(followers.is_empty());
    }

    #[tokio::test]
    async fn test_self_follow_is_400() {
        let state = test_state();
        let alice = seed_user(&state, "alice", "password123", true).await;

        let err = follow_user(
            State(state.clone()),
            AuthUser(authenticated(&state, alice.id)),
            follow_request(alice.id),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_follow_unknown_user_is_404() {
        let state = test_state();
        let alice = seed_user(&state, "alice", "password123", true).await;

        let err = follow_user(
            State(state.clone()),
            AuthUser(authenticated(&state, alice.id)),
            follow_request(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_follow_is_409() {
        let state = test_state();
        let alice = seed_user(&state, "alice", "password123", true).await;
        let bob = seed_user(&state, "bob", "password123", true).await;
        let caller = AuthUser(authenticated(&state, alice.id));

        follow_user(State(state.clone()), caller.clone(), follow_request(bob.id))
            .await
            .unwrap();
        let err = follow_user(State(state), caller, follow_request(bob.id))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unfollow_without_edge_succeeds() {
        let state = test_state();
        let alice = seed_user(&state, "alice", "password123", true).await;

        unfollow_user(
            State(state.clone()),
            AuthUser(authenticated(&state, alice.id)),
            follow_request(Uuid::new_v4()),
        )
        .await
        .unwrap();
    }
}
