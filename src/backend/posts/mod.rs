//! Posts Module
//!
//! Short text posts, optionally anonymous.
//!
//! - **`db`** - `Post` rows and the `PostRepo` trait
//! - **`handlers`** - `/api/posts` and `/api/user/{id}/posts`

/// Database operations for posts
pub mod db;

pub mod handlers;

pub use db::{PgPostRepo, Post, PostRepo, POSTS_PER_PAGE};
pub use handlers::{create_post, delete_post, get_post, get_posts_by_user, update_post};
