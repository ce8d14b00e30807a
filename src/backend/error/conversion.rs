/**
 * Error Conversion
 *
 * This module provides conversion implementations for backend errors,
 * allowing them to be converted to HTTP responses and built from the error
 * types of the stores, the token service and the mailer.
 *
 * # HTTP Response Conversion
 *
 * All backend errors implement `IntoResponse` from Axum, allowing them to be
 * returned directly from handlers. The error is automatically converted to an
 * appropriate HTTP status code and response body.
 *
 * # Response Format
 *
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 */

use axum::{
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::backend::auth::tokens::TokenError;
use crate::backend::codes::CacheError;
use crate::backend::email::MailError;
use crate::backend::error::types::{BackendError, RepoError};

impl IntoResponse for BackendError {
    /// Convert a backend error into an HTTP response
    ///
    /// Dependency failures are logged here with their source; the body only
    /// carries the generic message.
    fn into_response(self) -> Response {
        if let BackendError::DependencyError { dependency, source } = &self {
            tracing::error!("{} failure: {}", dependency, source);
        }

        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for BackendError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Conflict { field } => match field.as_str() {
                "email" => BackendError::conflict("Email already registered"),
                "username" => BackendError::conflict("Username already taken"),
                _ => BackendError::conflict("Record already exists"),
            },
            RepoError::Database(source) => BackendError::dependency("database", source),
        }
    }
}

impl From<CacheError> for BackendError {
    fn from(err: CacheError) -> Self {
        BackendError::dependency("cache", err)
    }
}

impl From<MailError> for BackendError {
    fn from(err: MailError) -> Self {
        BackendError::dependency("email", err)
    }
}

impl From<TokenError> for BackendError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Encode(_) => BackendError::dependency("token", err),
            TokenError::Expired => BackendError::auth("Token expired"),
            TokenError::InvalidSignature
            | TokenError::WrongKind
            | TokenError::Malformed => BackendError::auth("Invalid token"),
        }
    }
}

impl From<bcrypt::BcryptError> for BackendError {
    fn from(err: bcrypt::BcryptError) -> Self {
        BackendError::dependency("password hashing", err)
    }
}

/// JSON body extractor whose rejection is a `BackendError`
///
/// `axum::Json` answers a bad body with its own plain-text rejection. Every
/// handler takes `ApiJson<T>` instead so malformed or missing bodies come back
/// as the usual `{"error", "status": 400}` shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!("Rejected request body: {}", rejection.body_text());
            BackendError::validation(rejection.body_text())
        })?;
        Ok(ApiJson(value))
    }
}
