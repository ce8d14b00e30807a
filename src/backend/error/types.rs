/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the HTTP API. Every failure a
 * handler can hit maps onto exactly one variant, and every variant maps onto
 * exactly one status code.
 *
 * # Error Categories
 *
 * | Variant           | Status | Raised when                                   |
 * |-------------------|--------|-----------------------------------------------|
 * | `ValidationError` | 400    | malformed or missing input                    |
 * | `AuthError`       | 401    | bad credentials, invalid/expired/revoked token|
 * | `ForbiddenError`  | 403    | inactive account, caller is not the owner     |
 * | `NotFoundError`   | 404    | user or post does not exist                   |
 * | `ConflictError`   | 409    | duplicate email/username/follow               |
 * | `RateLimitError`  | 429    | resend cap reached                            |
 * | `DependencyError` | 500    | database, cache, mail, hashing or signing     |
 *
 * All errors are terminal for the request. Nothing is retried.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Boxed source error carried by `DependencyError`
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use sns_backend::backend::error::BackendError;
///
/// let err = BackendError::conflict("Email already registered");
/// assert_eq!(err.status_code().as_u16(), 409);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed or missing request input
    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
    },

    /// Credentials or bearer token rejected
    #[error("Authentication error: {message}")]
    AuthError {
        message: String,
    },

    /// Authenticated, but not allowed to do this
    #[error("Forbidden: {message}")]
    ForbiddenError {
        message: String,
    },

    #[error("Not found: {message}")]
    NotFoundError {
        message: String,
    },

    /// Uniqueness or state conflict
    #[error("Conflict: {message}")]
    ConflictError {
        message: String,
    },

    /// Resend cap reached within the counter window
    #[error("Rate limit exceeded: {message}")]
    RateLimitError {
        message: String,
    },

    /// An external collaborator failed
    ///
    /// The source is logged when the response is rendered; the client only
    /// ever sees a generic message.
    #[error("Dependency error ({dependency}): {source}")]
    DependencyError {
        /// Which collaborator failed (`database`, `cache`, `email`, ...)
        dependency: &'static str,
        source: BoxedSource,
    },

    /// Shared error (validation rules from the shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthError {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::ForbiddenError {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFoundError {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConflictError {
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimitError {
            message: message.into(),
        }
    }

    /// Wrap a collaborator failure
    ///
    /// # Arguments
    ///
    /// * `dependency` - Short name of the collaborator, used in logs
    /// * `source` - The underlying error
    pub fn dependency(dependency: &'static str, source: impl Into<BoxedSource>) -> Self {
        Self::DependencyError {
            dependency,
            source: source.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::AuthError { .. } => StatusCode::UNAUTHORIZED,
            Self::ForbiddenError { .. } => StatusCode::FORBIDDEN,
            Self::NotFoundError { .. } => StatusCode::NOT_FOUND,
            Self::ConflictError { .. } => StatusCode::CONFLICT,
            Self::RateLimitError { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::DependencyError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the client-facing error message
    ///
    /// Dependency failures never leak their source here.
    pub fn message(&self) -> String {
        match self {
            Self::ValidationError { message }
            | Self::AuthError { message }
            | Self::ForbiddenError { message }
            | Self::NotFoundError { message }
            | Self::ConflictError { message }
            | Self::RateLimitError { message } => message.clone(),
            Self::DependencyError { .. } => "Internal server error".to_string(),
            Self::SharedError(err) => err.message().to_string(),
        }
    }
}

/// Repository error
///
/// Returned by every credential, post and follow store. Unique-constraint
/// violations are lifted out of the driver error so handlers can answer 409
/// without string matching.
#[derive(Debug, Error)]
pub enum RepoError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated on {field}")]
    Conflict {
        /// `email`, `username` or `record` when the constraint is unknown
        field: String,
    },

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some(name) if name.contains("email") => "email",
                    Some(name) if name.contains("username") => "username",
                    _ => "record",
                };
                return Self::Conflict {
                    field: field.to_string(),
                };
            }
        }
        Self::Database(err)
    }
}
