/**
 * User Model and Database Operations
 *
 * This module handles the credential store: user rows and the queries
 * that read and write them.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::error::RepoError;
use crate::shared::{PublicProfile, UserProfile};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_active, bio, profile_image_url, created_at, updated_at";

/// User struct representing a user in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address (unique)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Set once the emailed verification code is confirmed
    pub is_active: bool,
    pub bio: String,
    pub profile_image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            bio: self.bio.clone(),
            profile_image_url: self.profile_image_url.clone(),
            is_active: self.is_active,
        }
    }

    pub fn public_profile(&self) -> PublicProfile {
        self.profile().into()
    }
}

/// Fields accepted at registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert an inactive user
    ///
    /// Fails with `RepoError::Conflict` when the email or username is taken.
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Mark the user active; `false` if no such user
    async fn activate(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, RepoError>;

    /// Delete the user; `false` if no such user
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Postgres implementation of `UserRepo`
#[derive(Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, FALSE, $5, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn activate(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_active = TRUE, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                bio = COALESCE($4, bio),
                profile_image_url = COALESCE($5, profile_image_url),
                updated_at = $6
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.email)
        .bind(update.password_hash)
        .bind(update.bio)
        .bind(update.profile_image_url)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
