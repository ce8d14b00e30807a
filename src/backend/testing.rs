//! Shared test utilities for handler and router tests.
//!
//! In-memory implementations of every store behind `AppState`, plus
//! `test_state()` to assemble them. The code store keeps TTLs on tokio's
//! clock, so `#[tokio::test(start_paused = true)]` with
//! `tokio::time::advance` exercises expiry without sleeping.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::backend::testing::TestStateBuilder;
//!
//! let (state, mailer) = TestStateBuilder::new().build_with_mailer();
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderValue;
use chrono::Utc;
use tokio::time::Instant;
use uuid::Uuid;

use crate::backend::auth::tokens::TokenKind;
use crate::backend::auth::users::{NewUser, User, UserRepo, UserUpdate};
use crate::backend::codes::{CacheError, CodeStore};
use crate::backend::email::{MailError, Mailer, OutgoingEmail};
use crate::backend::error::RepoError;
use crate::backend::follows::db::{Follow, FollowRepo};
use crate::backend::middleware::AuthenticatedUser;
use crate::backend::posts::db::{Post, PostRepo};
use crate::backend::server::config::Config;
use crate::backend::server::state::AppState;

/// Cheapest cost bcrypt accepts
pub const TEST_BCRYPT_COST: u32 = 4;

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://test".to_string(),
        redis_url: "redis://test".to_string(),
        jwt_secret: "test-access-secret".to_string(),
        jwt_refresh_secret: "test-refresh-secret".to_string(),
        email_address: "noreply@example.com".to_string(),
        email_password: "test".to_string(),
        smtp_host: "smtp.example.com".to_string(),
        smtp_port: 587,
        app_url: "http://localhost:5173".to_string(),
        app_lang: HeaderValue::from_static("en"),
        cors_origin: HeaderValue::from_static("http://localhost:5173"),
        server_port: 8080,
        bcrypt_cost: TEST_BCRYPT_COST,
    }
}

/// State backed entirely by in-memory stores
pub fn test_state() -> AppState {
    TestStateBuilder::new().build()
}

/// Builder for a test `AppState`
///
/// Any store not set explicitly gets a fresh empty in-memory one.
#[derive(Default)]
pub struct TestStateBuilder {
    users: Option<Arc<MemoryUserRepo>>,
    codes: Option<Arc<MemoryCodeStore>>,
    mailer: Option<Arc<RecordingMailer>>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(mut self, users: Arc<MemoryUserRepo>) -> Self {
        self.users = Some(users);
        self
    }

    pub fn with_codes(mut self, codes: Arc<MemoryCodeStore>) -> Self {
        self.codes = Some(codes);
        self
    }

    pub fn with_mailer(mut self, mailer: Arc<RecordingMailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_mailer().0
    }

    /// Build the state and hand back the mailer so tests can read its outbox
    pub fn build_with_mailer(self) -> (AppState, Arc<RecordingMailer>) {
        let mailer = self.mailer.unwrap_or_default();
        let state = AppState::new(
            test_config(),
            self.users.unwrap_or_default(),
            Arc::new(MemoryPostRepo::default()),
            Arc::new(MemoryFollowRepo::default()),
            self.codes.unwrap_or_default(),
            mailer.clone(),
        );
        (state, mailer)
    }
}

/// Insert a user directly, bypassing registration
pub async fn seed_user(state: &AppState, username: &str, password: &str, active: bool) -> User {
    let password_hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
    let user = state
        .users
        .create(NewUser {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash,
        })
        .await
        .unwrap();
    if active {
        state.users.activate(user.id).await.unwrap();
    }
    state.users.find_by_id(user.id).await.unwrap().unwrap()
}

/// What `auth_middleware` would attach for a freshly issued access token
pub fn authenticated(state: &AppState, user_id: Uuid) -> AuthenticatedUser {
    let token = state.tokens.issue(user_id, TokenKind::Access).unwrap();
    let claims = state.tokens.validate(&token, TokenKind::Access).unwrap();
    AuthenticatedUser { user_id, claims }
}

/// `Authorization` header value for a freshly issued access token
pub fn bearer(state: &AppState, user_id: Uuid) -> String {
    format!("Bearer {}", state.tokens.issue(user_id, TokenKind::Access).unwrap())
}

#[derive(Default)]
pub struct MemoryCodeStore {
    entries: Mutex<HashMap<String, (String, Option<Instant>)>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remaining TTL of a live key, `None` if absent or persistent
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock().unwrap();
        let (_, deadline) = entries.get(key)?;
        deadline.map(|d| d.saturating_duration_since(Instant::now()))
    }

    fn live<'a>(
        entries: &'a mut HashMap<String, (String, Option<Instant>)>,
        key: &str,
    ) -> Option<&'a mut (String, Option<Instant>)> {
        let expired = matches!(entries.get(key), Some((_, Some(deadline))) if *deadline <= Instant::now());
        if expired {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), (value.to_string(), Some(Instant::now() + ttl)));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        Ok(Self::live(&mut entries, key).map(|(value, _)| value.clone()))
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        let next = match Self::live(&mut entries, key) {
            Some((value, _)) => {
                let current: i64 = value.parse().map_err(|_| CacheError::Corrupt {
                    key: key.to_string(),
                })?;
                *value = (current + 1).to_string();
                current + 1
            }
            None => {
                entries.insert(key.to_string(), ("1".to_string(), None));
                1
            }
        };
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().unwrap();
        if let Some((_, deadline)) = Self::live(&mut entries, key) {
            *deadline = Some(Instant::now() + ttl);
        }
        Ok(())
    }
}

/// Mailer that keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    outbox: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
    delay: Option<Duration>,
}

impl RecordingMailer {
    /// A mailer whose sends take `delay` to complete
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.outbox.lock().unwrap().clone()
    }

    pub fn last_to(&self, to: &str) -> Option<OutgoingEmail> {
        self.sent().into_iter().rev().find(|email| email.to == to)
    }

    /// Make every later send fail
    pub fn fail_sends(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            let err = "not-an-address".parse::<lettre::Address>().unwrap_err();
            return Err(MailError::Address(err));
        }
        self.outbox.lock().unwrap().push(email);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<Vec<User>>,
}

impl MemoryUserRepo {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(RepoError::Conflict { field: "email".to_string() });
        }
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(RepoError::Conflict { field: "username".to_string() });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_active: false,
            bio: String::new(),
            profile_image_url: String::new(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn activate(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.is_active = true;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update(&self, id: Uuid, update: UserUpdate) -> Result<Option<User>, RepoError> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = &update.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(RepoError::Conflict { field: "email".to_string() });
            }
        }

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        if let Some(bio) = update.bio {
            user.bio = bio;
        }
        if let Some(url) = update.profile_image_url {
            user.profile_image_url = url;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(users.len() < before)
    }
}

/// Posts kept in insertion order, which is also creation order
#[derive(Default)]
pub struct MemoryPostRepo {
    posts: Mutex<Vec<Post>>,
}

#[async_trait]
impl PostRepo for MemoryPostRepo {
    async fn create(&self, user_id: Option<Uuid>, content: &str) -> Result<Post, RepoError> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            content: content.to_string(),
            user_id,
            like_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, RepoError> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|p| p.user_id == Some(user_id))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update_content(&self, id: Uuid, content: &str) -> Result<Option<Post>, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.content = content.to_string();
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryFollowRepo {
    follows: Mutex<Vec<Follow>>,
}

#[async_trait]
impl FollowRepo for MemoryFollowRepo {
    async fn create(&self, follower_id: Uuid, followed_id: Uuid) -> Result<Follow, RepoError> {
        let follow = Follow {
            id: Uuid::new_v4(),
            follower_id,
            followed_id,
            created_at: Utc::now(),
        };
        self.follows.lock().unwrap().push(follow.clone());
        Ok(follow)
    }

    async fn exists(&self, follower_id: Uuid, followed_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .any(|f| f.follower_id == follower_id && f.followed_id == followed_id))
    }

    async fn delete(&self, follower_id: Uuid, followed_id: Uuid) -> Result<u64, RepoError> {
        let mut follows = self.follows.lock().unwrap();
        let before = follows.len();
        follows.retain(|f| !(f.follower_id == follower_id && f.followed_id == followed_id));
        Ok((before - follows.len()) as u64)
    }

    async fn followers(&self, user_id: Uuid) -> Result<Vec<Follow>, RepoError> {
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.followed_id == user_id)
            .cloned()
            .collect())
    }

    async fn following(&self, user_id: Uuid) -> Result<Vec<Follow>, RepoError> {
        Ok(self
            .follows
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.follower_id == user_id)
            .cloned()
            .collect())
    }
}
