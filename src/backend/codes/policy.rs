/**
 * Code Policy
 *
 * Key layout and lifetime rules on top of `CodeStore`.
 *
 * # Keys
 *
 * | Key                    | Value                          | TTL            |
 * |------------------------|--------------------------------|----------------|
 * | `<email>`              | 4-digit code or reset token    | 10 minutes     |
 * | `resend_count_<email>` | resend attempts                | 12 hours, re-armed per claimed attempt |
 * | `revoked_token_<jti>`  | `"1"`                          | token lifetime left |
 *
 * Verification resends and password-reset requests go through the same
 * counter, capped at `MAX_RESENDS`. A slot is claimed before anything is
 * mailed.
 */

use std::time::Duration;

use rand::{rngs::OsRng, Rng};
use uuid::Uuid;

use super::store::{CacheError, CodeStore};
use crate::backend::auth::tokens::Claims;

pub const VERIFICATION_CODE_TTL: Duration = Duration::from_secs(10 * 60);
pub const RESEND_WINDOW: Duration = Duration::from_secs(12 * 60 * 60);
pub const MAX_RESENDS: i64 = 3;

pub fn code_key(email: &str) -> String {
    email.to_string()
}

pub fn resend_count_key(email: &str) -> String {
    format!("resend_count_{}", email)
}

pub fn revoked_token_key(jti: &Uuid) -> String {
    format!("revoked_token_{}", jti)
}

/// Random 4-digit code, zero-padded, from the OS RNG
pub fn generate_code() -> String {
    let n: u32 = OsRng.gen_range(0..10_000);
    format!("{:04}", n)
}

/// Replace any pending code for `email` with a fresh one and return it
pub async fn issue_verification_code(
    store: &dyn CodeStore,
    email: &str,
) -> Result<String, CacheError> {
    let key = code_key(email);
    store.del(&key).await?;

    let code = generate_code();
    store.set(&key, &code, VERIFICATION_CODE_TTL).await?;
    Ok(code)
}

/// Whether a submitted code matches the stored one
///
/// A missing or expired code never matches.
pub async fn code_matches(
    store: &dyn CodeStore,
    email: &str,
    submitted: &str,
) -> Result<bool, CacheError> {
    Ok(store.get(&code_key(email)).await?.as_deref() == Some(submitted))
}

/// Drop the code and the resend counter after a successful verification
pub async fn clear_verification(store: &dyn CodeStore, email: &str) -> Result<(), CacheError> {
    store.del(&code_key(email)).await?;
    store.del(&resend_count_key(email)).await
}

pub async fn resend_count(store: &dyn CodeStore, email: &str) -> Result<i64, CacheError> {
    let key = resend_count_key(email);
    match store.get(&key).await? {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| CacheError::Corrupt { key }),
    }
}

/// Claim one attempt in the window before any code is issued or mailed
///
/// `INCR` is atomic, so concurrent callers never claim more than
/// `MAX_RESENDS` slots between them. Returns the attempt number, or `None`
/// once the cap is reached. Only a claimed attempt re-arms the window.
pub async fn reserve_resend(store: &dyn CodeStore, email: &str) -> Result<Option<i64>, CacheError> {
    let key = resend_count_key(email);
    let attempt = store.incr(&key).await?;
    if attempt > MAX_RESENDS {
        return Ok(None);
    }
    store.expire(&key, RESEND_WINDOW).await?;
    Ok(Some(attempt))
}

/// Mark a token as revoked for the rest of its lifetime
///
/// Already-expired tokens need no entry.
pub async fn revoke_token(store: &dyn CodeStore, claims: &Claims) -> Result<(), CacheError> {
    let remaining = claims.remaining();
    if remaining.is_zero() {
        return Ok(());
    }
    store.set(&revoked_token_key(&claims.jti), "1", remaining).await
}

pub async fn is_revoked(store: &dyn CodeStore, jti: &Uuid) -> Result<bool, CacheError> {
    Ok(store.get(&revoked_token_key(jti)).await?.is_some())
}
