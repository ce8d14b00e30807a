/**
 * Follow Database Operations
 *
 * A follow is a directed edge `follower_id -> followed_id`. The table has no
 * uniqueness constraint; the handlers check for an existing edge first.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::error::RepoError;
use crate::shared::FollowView;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn view(&self) -> FollowView {
        FollowView {
            follower_id: self.follower_id,
            followed_id: self.followed_id,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
pub trait FollowRepo: Send + Sync {
    async fn create(&self, follower_id: Uuid, followed_id: Uuid) -> Result<Follow, RepoError>;

    async fn exists(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError>;

    /// Remove every matching edge and return how many went
    async fn delete(&self, follower_id: Uuid, followed_id: Uuid) -> Result<u64, RepoError>;

    /// Edges pointing at `user_id`
    async fn followers(&self, user_id: Uuid) -> Result<Vec<Follow>, RepoError>;

    /// Edges leaving `user_id`
    async fn following(&self, user_id: Uuid) -> Result<Vec<Follow>, RepoError>;
}

#[derive(Clone)]
pub struct PgFollowRepo {
    pool: PgPool,
}

impl PgFollowRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepo for PgFollowRepo {
    async fn create(&self, follower_id: Uuid, followed_id: Uuid) -> Result<Follow, RepoError> {
        let follow = sqlx::query_as::<_, Follow>(
            r#"
            INSERT INTO follows (id, follower_id, followed_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, follower_id, followed_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(follower_id)
        .bind(followed_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(follow)
    }

    async fn exists(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError> {
        let found: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found)
    }

    async fn delete(&self, follower_id: Uuid, followed_id: Uuid) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn followers(&self, user_id: Uuid) -> Result<Vec<Follow>, RepoError> {
        let follows = sqlx::query_as::<_, Follow>(
            r#"
            SELECT id, follower_id, followed_id, created_at
            FROM follows
            WHERE followed_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(follows)
    }

    async fn following(&self, user_id: Uuid) -> Result<Vec<Follow>, RepoError> {
        let follows = sqlx::query_as::<_, Follow>(
            r#"
            SELECT id, follower_id, followed_id, created_at
            FROM follows
            WHERE follower_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(follows)
    }
}
