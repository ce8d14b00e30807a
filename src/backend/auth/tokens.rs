/**
 * Token Service
 *
 * Issues and validates the HS256 bearer tokens used by the API.
 *
 * # Token Kinds
 *
 * | Kind      | Secret         | Default TTL |
 * |-----------|----------------|-------------|
 * | `Access`  | access secret  | 24 hours    |
 * | `Refresh` | refresh secret | 7 days      |
 * | `Reset`   | access secret  | 10 minutes  |
 *
 * Every token carries its kind as a claim and only validates as that kind.
 * Secrets are fixed when the service is built; nothing here reads the
 * environment.
 */

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const ACCESS_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);
pub const RESET_TOKEN_TTL: Duration = Duration::from_secs(10 * 60);

/// A refresh token with less validity left than this gets a new access token
pub const REFRESH_THRESHOLD: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
    Reset,
}

impl TokenKind {
    pub fn default_ttl(self) -> Duration {
        match self {
            TokenKind::Access => ACCESS_TOKEN_TTL,
            TokenKind::Refresh => REFRESH_TOKEN_TTL,
            TokenKind::Reset => RESET_TOKEN_TTL,
        }
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub kind: TokenKind,
    /// Unique token id, the revocation key
    pub jti: Uuid,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn subject_id(&self) -> Uuid {
        self.sub
    }

    /// Validity left at `now`, zero once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        let secs = self.exp - now.timestamp();
        Duration::from_secs(secs.max(0) as u64)
    }

    pub fn remaining(&self) -> Duration {
        self.remaining_at(Utc::now())
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token was issued for a different purpose")]
    WrongKind,

    #[error("Token is malformed")]
    Malformed,

    /// Signing failed; a server-side problem, not a client one
    #[error("Failed to sign token: {0}")]
    Encode(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Signs and verifies tokens with the two configured secrets
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build a service from the access and refresh secrets
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            validation,
        }
    }

    fn keys(&self, kind: TokenKind) -> (&EncodingKey, &DecodingKey) {
        match kind {
            TokenKind::Refresh => (&self.refresh_encoding, &self.refresh_decoding),
            TokenKind::Access | TokenKind::Reset => (&self.access_encoding, &self.access_decoding),
        }
    }

    /// Issue a token with the kind's default TTL
    pub fn issue(&self, subject_id: Uuid, kind: TokenKind) -> Result<String, TokenError> {
        self.issue_with_ttl(subject_id, kind, kind.default_ttl())
    }

    pub fn issue_with_ttl(
        &self,
        subject_id: Uuid,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.issue_at(subject_id, kind, Utc::now(), ttl)
    }

    /// Issue a token as if it had been minted at `issued_at`
    pub fn issue_at(
        &self,
        subject_id: Uuid,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: subject_id,
            kind,
            jti: Uuid::new_v4(),
            iat,
            exp: iat + ttl.as_secs() as i64,
        };

        let (encoding, _) = self.keys(kind);
        encode(&Header::new(Algorithm::HS256), &claims, encoding).map_err(TokenError::Encode)
    }

    /// Verify signature, expiry and kind
    ///
    /// # Errors
    ///
    /// * `InvalidSignature` - signed with another secret
    /// * `Expired` - past its `exp`
    /// * `WrongKind` - valid, but minted for another purpose
    /// * `Malformed` - anything that is not a well-formed token of ours
    pub fn validate(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let (_, decoding) = self.keys(kind);
        let data = decode::<Claims>(token, decoding, &self.validation)?;

        if data.claims.kind != kind {
            return Err(TokenError::WrongKind);
        }
        Ok(data.claims)
    }

    /// Re-issue an access token when the refresh token is about to lapse
    ///
    /// Returns `Ok(None)` while the refresh token still has at least
    /// `REFRESH_THRESHOLD` of validity left.
    pub fn refresh(&self, refresh_token: &str) -> Result<Option<String>, TokenError> {
        let claims = self.validate(refresh_token, TokenKind::Refresh)?;

        if claims.remaining() >= REFRESH_THRESHOLD {
            return Ok(None);
        }
        self.issue(claims.sub, TokenKind::Access).map(Some)
    }
}
