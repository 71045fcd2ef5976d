//! PostgreSQL repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::{DbConn, DbErr, FromQueryResult, QueryResult, Value};

use posts_core::domain::{NewPost, Post, PostChanges, PostId};
use posts_core::error::RepoError;
use posts_core::ports::PostRepository;

use super::update::build_update;
use super::{DatabasePool, QueryExecutor};

pub(crate) const POST_COLUMNS: &str = "id, titulo, contenido, usuario_id, created_at";

pub(crate) const LIST_SQL: &str = "SELECT id, titulo, contenido, usuario_id, created_at \
     FROM posts ORDER BY created_at DESC, id DESC";
pub(crate) const FIND_SQL: &str =
    "SELECT id, titulo, contenido, usuario_id, created_at FROM posts WHERE id = $1";
pub(crate) const INSERT_SQL: &str = "INSERT INTO posts (titulo, contenido, usuario_id) \
     VALUES ($1, $2, $3) RETURNING id, titulo, contenido, usuario_id, created_at";
pub(crate) const DELETE_SQL: &str = "DELETE FROM posts WHERE id = $1 RETURNING id";

/// A `posts` row as returned by the driver.
#[derive(Debug)]
struct PostRow {
    id: i32,
    titulo: String,
    contenido: String,
    usuario_id: i32,
    created_at: DateTime<Utc>,
}

impl FromQueryResult for PostRow {
    fn from_query_result(res: &QueryResult, pre: &str) -> Result<Self, DbErr> {
        Ok(Self {
            id: res.try_get(pre, "id")?,
            titulo: res.try_get(pre, "titulo")?,
            contenido: res.try_get(pre, "contenido")?,
            usuario_id: res.try_get(pre, "usuario_id")?,
            created_at: created_at(res, pre)?,
        })
    }
}

/// `created_at` from a `TIMESTAMPTZ` column, or from a `TIMESTAMP` column
/// read as UTC.
fn created_at(res: &QueryResult, pre: &str) -> Result<DateTime<Utc>, DbErr> {
    match res.try_get::<DateTime<Utc>>(pre, "created_at") {
        Ok(at) => Ok(at),
        Err(tz_err) => res
            .try_get::<NaiveDateTime>(pre, "created_at")
            .map(|naive| naive.and_utc())
            .map_err(|_| tz_err),
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            titulo: row.titulo,
            contenido: row.contenido,
            usuario_id: row.usuario_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct DeletedRow {
    id: i32,
}

/// PostgreSQL post repository.
#[derive(Clone)]
pub struct PostgresPostRepository {
    executor: QueryExecutor,
}

impl PostgresPostRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            executor: QueryExecutor::new(pool),
        }
    }

    /// Build directly from a connection, e.g. a `MockDatabase`.
    pub fn from_connection(conn: impl Into<Arc<DbConn>>) -> Self {
        Self::new(DatabasePool::from_connection(conn))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let rows: Vec<PostRow> = self.executor.query(LIST_SQL, vec![]).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = id, "Finding post by id");

        let row: Option<PostRow> = self.executor.query_one(FIND_SQL, vec![id.into()]).await?;
        Ok(row.map(Into::into))
    }

    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let values: Vec<Value> = vec![
            post.titulo.into(),
            post.contenido.into(),
            post.usuario_id.into(),
        ];

        let row: Option<PostRow> = self.executor.query_one(INSERT_SQL, values).await?;
        row.map(Into::into)
            .ok_or_else(|| RepoError::Query("INSERT returned no row".to_string()))
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> Result<Option<Post>, RepoError> {
        let stmt = build_update("posts", id, changes, POST_COLUMNS);
        tracing::debug!(post_id = id, statement = %stmt.sql, "Updating post");

        let row: Option<PostRow> = self.executor.query_one(&stmt.sql, stmt.values).await?;
        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: PostId) -> Result<Option<PostId>, RepoError> {
        let row: Option<DeletedRow> = self.executor.query_one(DELETE_SQL, vec![id.into()]).await?;
        Ok(row.map(|r| r.id))
    }
}
