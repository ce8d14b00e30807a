//! Follows Module
//!
//! Directed follow edges between users.
//!
//! - **`db`** - `Follow` rows and the `FollowRepo` trait
//! - **`handlers`** - follow, unfollow and the two listing endpoints

/// Database operations for follow edges
pub mod db;

pub mod handlers;

pub use db::{Follow, FollowRepo, PgFollowRepo};
pub use handlers::{follow_user, get_followers, get_following, unfollow_user};
