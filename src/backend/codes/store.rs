//! Ephemeral key-value store for verification codes, reset tokens,
//! resend counters and revoked token ids.
//!
//! Only five commands are needed, so the trait mirrors them one to one.
//! Production uses Redis; tests use the in-memory store in `backend::testing`.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A key held something other than what the caller stored there
    #[error("Unexpected value under key '{key}'")]
    Corrupt { key: String },
}

#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value and TTL
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Remove `key`; a missing key is not an error
    async fn del(&self, key: &str) -> Result<(), CacheError>;

    /// Increment the integer under `key`, creating it at 1 without a TTL
    async fn incr(&self, key: &str) -> Result<i64, CacheError>;

    /// Re-arm the TTL of an existing key
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Redis implementation of `CodeStore`
///
/// Holds one multiplexed connection; clones share it.
#[derive(Clone)]
pub struct RedisCodeStore {
    conn: MultiplexedConnection,
}

impl RedisCodeStore {
    /// Open a connection and check it with `PING`
    pub async fn connect(redis_url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let mut conn = client.get_multiplexed_async_connection().await?;

        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        tracing::info!("Connected to Redis ({})", pong);

        Ok(Self { conn })
    }
}

#[async_trait]
impl CodeStore for RedisCodeStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, CacheError> {
        let mut conn = self.conn.clone();
        let count: i64 = redis::cmd("INCR").arg(key).query_async(&mut conn).await?;
        Ok(count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
