/**
 * Post Database Operations
 *
 * Posts may be anonymous (`user_id IS NULL`). When the author's account is
 * deleted the foreign key sets `user_id` to NULL and the post stays.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::error::RepoError;
use crate::shared::PostView;

/// Posts returned per page by `list_by_user`
pub const POSTS_PER_PAGE: i64 = 10;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    pub user_id: Option<Uuid>,
    pub like_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }

    pub fn view(&self) -> PostView {
        PostView {
            id: self.id,
            content: self.content.clone(),
            user_id: self.user_id,
            like_count: self.like_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row offset for a 1-based page number; pages below 1 count as 1
pub fn page_offset(page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(POSTS_PER_PAGE)
}

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn create(&self, user_id: Option<Uuid>, content: &str) -> Result<Post, RepoError>;

    async fn find(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Newest first
    async fn list_by_user(&self, user_id: Uuid, limit: i64, offset: i64)
        -> Result<Vec<Post>, RepoError>;

    async fn update_content(&self, id: Uuid, content: &str) -> Result<Option<Post>, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

#[derive(Clone)]
pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn create(&self, user_id: Option<Uuid>, content: &str) -> Result<Post, RepoError> {
        let now = Utc::now();

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, content, user_id, like_count, created_at, updated_at)
            VALUES ($1, $2, $3, 0, $4, $4)
            RETURNING id, content, user_id, like_count, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(content)
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, user_id, like_count, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, user_id, like_count, created_at, updated_at
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn update_content(&self, id: Uuid, content: &str) -> Result<Option<Post>, RepoError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET content = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, content, user_id, like_count, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
