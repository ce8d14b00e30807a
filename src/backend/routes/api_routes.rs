/**
 * API Route Table
 *
 * Every endpoint lives under `/api`.
 *
 * # Public
 * - `POST /api/register`, `/api/verify`, `/api/resend-verification-code`
 * - `POST /api/login`, `/api/refresh-token`
 * - `POST /api/request-password-reset`, `/api/reset-password`
 * - `GET /api/user/{id}/posts`, `/api/user/{id}/followers`, `/api/user/{id}/following`
 * - `GET /api/posts/{id}`, `GET /api/ping`
 *
 * # Optional token
 * - `GET /api/user/{id}`, `POST /api/posts`
 *
 * # Access guard
 * - `POST /api/logout`, `GET /api/getuser`, `PUT|DELETE /api/user`
 * - `PUT|DELETE /api/posts/{id}`, `POST /api/follow`, `POST /api/unfollow`
 */

use axum::{
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{
    delete_user, get_auth_user, get_user, login, logout, refresh_token, register,
    request_password_reset, resend_verification_code, reset_password, update_user, verify,
};
use crate::backend::follows::{follow_user, get_followers, get_following, unfollow_user};
use crate::backend::middleware::auth_middleware;
use crate::backend::posts::{create_post, delete_post, get_post, get_posts_by_user, update_post};
use crate::backend::server::state::AppState;
use crate::shared::MessageResponse;

/// Liveness probe
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World! Pong"))
}

/// Routes reachable without a token
///
/// Handlers here that take `MaybeAuthUser` read the token themselves.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ping", get(ping))
        .route("/api/register", post(register))
        .route("/api/verify", post(verify))
        .route("/api/resend-verification-code", post(resend_verification_code))
        .route("/api/login", post(login))
        .route("/api/refresh-token", post(refresh_token))
        .route("/api/request-password-reset", post(request_password_reset))
        .route("/api/reset-password", post(reset_password))
        .route("/api/user/{id}", get(get_user))
        .route("/api/user/{id}/posts", get(get_posts_by_user))
        .route("/api/user/{id}/followers", get(get_followers))
        .route("/api/user/{id}/following", get(get_following))
        .route("/api/posts", post(create_post))
        .route("/api/posts/{id}", get(get_post))
}

/// Routes behind `auth_middleware`
///
/// `route_layer` only guards routes that match, so unknown paths still 404
/// instead of 401.
fn protected_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/logout", post(logout))
        .route("/api/getuser", get(get_auth_user))
        .route("/api/user", axum::routing::put(update_user).delete(delete_user))
        .route(
            "/api/posts/{id}",
            axum::routing::put(update_post).delete(delete_post),
        )
        .route("/api/follow", post(follow_user))
        .route("/api/unfollow", post(unfollow_user))
        .route_layer(middleware::from_fn_with_state(app_state, auth_middleware))
}

/// Configure API routes
///
/// `GET /api/posts/{id}` is public while `PUT`/`DELETE` on the same path are
/// guarded; merging joins the two method routers.
pub fn configure_api_routes(app_state: AppState) -> Router<AppState> {
    public_routes().merge(protected_routes(app_state))
}
