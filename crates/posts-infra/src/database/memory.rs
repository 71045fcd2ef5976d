//! In-memory post repository - used when the postgres feature is disabled and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use posts_core::domain::{NewPost, Post, PostChanges, PostId};
use posts_core::error::RepoError;
use posts_core::ports::PostRepository;

#[derive(Default)]
struct Table {
    rows: BTreeMap<PostId, Post>,
    last_id: PostId,
}

/// In-memory repository mirroring the `posts` table semantics.
///
/// IDs start at 1 and are never reused, like a `SERIAL` column.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<Table>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let table = self.table.read().await;
        let mut posts: Vec<Post> = table.rows.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(posts)
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let stored = Post {
            id: table.last_id,
            titulo: post.titulo,
            contenido: post.contenido,
            usuario_id: post.usuario_id,
            created_at: Utc::now(),
        };
        table.rows.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Option<Post>, RepoError> {
        let mut table = self.table.write().await;
        let updated = table.rows.get_mut(&id).map(|post| {
            changes.apply(post);
            post.clone()
        });
        Ok(updated)
    }

    async fn delete(&self, id: PostId) -> Result<Option<PostId>, RepoError> {
        Ok(self.table.write().await.rows.remove(&id).map(|post| post.id))
    }
}
