/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is read-only after start-up. It holds the configuration, the
 * token service and one handle per collaborator:
 * - `users`, `posts`, `follows` - credential/post/follow stores (Postgres)
 * - `codes` - ephemeral code store (Redis)
 * - `mailer` - notification sender (SMTP)
 *
 * Collaborators are trait objects so the same router runs against
 * in-memory stores in tests.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::tokens::TokenService;
use crate::backend::auth::users::UserRepo;
use crate::backend::codes::CodeStore;
use crate::backend::email::Mailer;
use crate::backend::follows::db::FollowRepo;
use crate::backend::posts::db::PostRepo;
use crate::backend::server::config::Config;

/// Application state shared by every handler
///
/// # Usage
///
/// ```rust,ignore
/// use axum::extract::State;
/// use sns_backend::backend::server::state::AppState;
///
/// async fn handler(State(state): State<AppState>) {
///     let user = state.users.find_by_email("alice@example.com").await;
/// }
/// ```
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: TokenService,
    pub users: Arc<dyn UserRepo>,
    pub posts: Arc<dyn PostRepo>,
    pub follows: Arc<dyn FollowRepo>,
    pub codes: Arc<dyn CodeStore>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Assemble state; the token service is keyed from `config`
    pub fn new(
        config: Config,
        users: Arc<dyn UserRepo>,
        posts: Arc<dyn PostRepo>,
        follows: Arc<dyn FollowRepo>,
        codes: Arc<dyn CodeStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt_secret, &config.jwt_refresh_secret);
        Self {
            config: Arc::new(config),
            tokens,
            users,
            posts,
            follows,
            codes,
            mailer,
        }
    }
}

/// `State<TokenService>` for handlers that only sign or check tokens
impl FromRef<AppState> for TokenService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

/// `State<Arc<dyn CodeStore>>` for handlers that only touch the cache
impl FromRef<AppState> for Arc<dyn CodeStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.codes.clone()
    }
}
