use async_trait::async_trait;

use crate::domain::{NewPost, Post, PostChanges, PostId};
use crate::error::RepoError;

/// Storage for posts.
///
/// Every method maps to exactly one statement against the store. "No such
/// row" is reported as `None`, never as an error.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest first.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Find a post by its ID.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError>;

    /// Insert a post and return the stored row, including `id` and `created_at`.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Apply `changes` to the post and return the updated row.
    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Option<Post>, RepoError>;

    /// Delete a post, returning the ID of the removed row.
    async fn delete(&self, id: PostId) -> Result<Option<PostId>, RepoError>;
}
