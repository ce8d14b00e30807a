//! Ephemeral Code Store
//!
//! - **`store`** - `CodeStore` trait and the Redis implementation
//! - **`policy`** - key layout, code generation, resend cap, token revocation

pub mod policy;
pub mod store;

pub use store::{CacheError, CodeStore, RedisCodeStore};
