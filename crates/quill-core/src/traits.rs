// crates/quill-core/src/traits.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::QuillError;
use crate::ids::{PostId, UserId};
use crate::post::{Post, PostPatch};
use crate::user::User;

/// Keyed storage for posts.
///
/// Implemented by quill-store (in-memory backend).
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a new post. Fails with `Conflict` if the id is already present.
    async fn insert_post(&self, post: Post) -> Result<(), QuillError>;

    /// Retrieve a post by id.
    async fn get_post(&self, id: &PostId) -> Result<Option<Post>, QuillError>;

    /// All posts, ordered by `(created_at, id)` ascending.
    async fn list_posts(&self) -> Result<Vec<Post>, QuillError>;

    /// Posts written by `author`, in the same order as `list_posts`.
    async fn list_posts_by_author(&self, author: &UserId) -> Result<Vec<Post>, QuillError>;

    /// Atomically merge `patch` into the stored post and return the result.
    /// Returns `None` if the post does not exist.
    async fn update_post(
        &self,
        id: &PostId,
        patch: &PostPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, QuillError>;

    /// Remove a post, returning it if it existed.
    async fn remove_post(&self, id: &PostId) -> Result<Option<Post>, QuillError>;
}

/// Keyed storage for users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `Conflict` if the id is already present.
    async fn insert_user(&self, user: User) -> Result<(), QuillError>;

    /// Retrieve a user by id.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, QuillError>;
}
