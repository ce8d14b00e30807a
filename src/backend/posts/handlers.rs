/**
 * Post Handlers
 *
 * - `POST /api/posts` - create a post, anonymous when no valid token is sent
 * - `GET /api/posts/{id}` - fetch one post
 * - `GET /api/user/{id}/posts?page=N` - a user's posts, newest first
 * - `PUT /api/posts/{id}` - edit (owner only)
 * - `DELETE /api/posts/{id}` - delete (owner only)
 *
 * Anonymous posts have no owner, so nobody can edit or delete them.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::error::{ApiJson, BackendError};
use crate::backend::middleware::{AuthUser, MaybeAuthUser};
use crate::backend::posts::db::{page_offset, Post, POSTS_PER_PAGE};
use crate::backend::server::state::AppState;
use crate::shared::validation::validate_post_content;
use crate::shared::{MessageResponse, PostView};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostRequest {
    pub content: String,
}

/// `?page=N`; a missing or unparsable value means page 1
#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub page: i64,
}

async fn owned_post(app_state: &AppState, id: Uuid, user_id: Uuid) -> Result<Post, BackendError> {
    let post = app_state
        .posts
        .find(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;

    if !post.is_owned_by(user_id) {
        tracing::warn!("User {} tried to modify post {} they do not own", user_id, id);
        return Err(BackendError::forbidden("You can only modify your own posts"));
    }
    Ok(post)
}

/// Create post handler
///
/// Content is trimmed and must be 1-255 characters.
pub async fn create_post(
    State(app_state): State<AppState>,
    caller: MaybeAuthUser,
    ApiJson(request): ApiJson<PostRequest>,
) -> Result<(StatusCode, Json<PostView>), BackendError> {
    let content = validate_post_content(&request.content)?;

    let post = app_state.posts.create(caller.user_id(), &content).await?;

    match post.user_id {
        Some(user_id) => tracing::info!("Post {} created by {}", post.id, user_id),
        None => tracing::info!("Anonymous post {} created", post.id),
    }
    Ok((StatusCode::CREATED, Json(post.view())))
}

pub async fn get_post(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostView>, BackendError> {
    let post = app_state
        .posts
        .find(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;

    Ok(Json(post.view()))
}

/// List a user's posts, `POSTS_PER_PAGE` at a time
///
/// An unknown user simply has no posts.
pub async fn get_posts_by_user(
    State(app_state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PostPage>, BackendError> {
    let page = query.page();
    let posts = app_state
        .posts
        .list_by_user(user_id, POSTS_PER_PAGE, page_offset(page))
        .await?;

    Ok(Json(PostPage {
        posts: posts.iter().map(Post::view).collect(),
        page,
    }))
}

pub async fn update_post(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<PostRequest>,
) -> Result<Json<PostView>, BackendError> {
    let content = validate_post_content(&request.content)?;
    owned_post(&app_state, id, auth.user_id).await?;

    let post = app_state
        .posts
        .update_content(id, &content)
        .await?
        .ok_or_else(|| BackendError::not_found("Post not found"))?;

    tracing::info!("Post {} updated by {}", id, auth.user_id);
    Ok(Json(post.view()))
}

pub async fn delete_post(
    State(app_state): State<AppState>,
    AuthUser(auth): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, BackendError> {
    owned_post(&app_state, id, auth.user_id).await?;

    if !app_state.posts.delete(id).await? {
        return Err(BackendError::not_found("Post not found"));
    }

    tracing::info!("Post {} deleted by {}", id, auth.user_id);
    Ok(Json(MessageResponse::new("Post deleted successfully")))
}
