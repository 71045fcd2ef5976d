//! Post resource service - validation and lifecycle operations.

use std::sync::Arc;

use crate::domain::{NewPost, Post, PostChanges, PostId};
use crate::error::DomainError;
use crate::ports::PostRepository;

pub const MISSING_CREATE_FIELDS: &str = "titulo, contenido y usuario_id son obligatorios";
pub const NOTHING_TO_UPDATE: &str = "Nada que actualizar (titulo o contenido)";

/// Input for [`PostService::create`]. Every field is optional here so that
/// validation can report all the missing ones at once.
#[derive(Debug, Clone, Default)]
pub struct CreatePost {
    pub titulo: Option<String>,
    pub contenido: Option<String>,
    pub usuario_id: Option<i32>,
}

/// Input for [`PostService::update`]. `None` means "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub titulo: Option<String>,
    pub contenido: Option<String>,
}

/// Post lifecycle operations on top of a [`PostRepository`].
///
/// Holds no state besides the repository handle; every call goes to the store.
#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    /// All posts, newest first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get(&self, id: PostId) -> Result<Post, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))
    }

    /// Validate and insert a new post.
    pub async fn create(&self, input: CreatePost) -> Result<Post, DomainError> {
        let titulo = supplied("titulo", input.titulo);
        let contenido = supplied("contenido", input.contenido);
        // Zero is not a valid user reference.
        let usuario_id = input.usuario_id.filter(|id| *id != 0);

        let mut missing = Vec::new();
        if titulo.is_none() {
            missing.push("titulo");
        }
        if contenido.is_none() {
            missing.push("contenido");
        }
        if usuario_id.is_none() {
            missing.push("usuario_id");
        }

        let (Some(titulo), Some(contenido), Some(usuario_id)) = (titulo, contenido, usuario_id)
        else {
            tracing::debug!(?missing, "Rejected post creation");
            return Err(DomainError::validation(MISSING_CREATE_FIELDS, missing));
        };

        let post = self
            .repo
            .insert(NewPost {
                titulo,
                contenido,
                usuario_id,
            })
            .await?;

        tracing::debug!(post_id = post.id, "Post created");
        Ok(post)
    }

    /// Partially update a post. Only the supplied fields are written.
    pub async fn update(&self, id: PostId, input: UpdatePost) -> Result<Post, DomainError> {
        let changes = PostChanges::new(
            supplied("titulo", input.titulo),
            supplied("contenido", input.contenido),
        )
        .ok_or_else(|| {
            DomainError::validation(NOTHING_TO_UPDATE, vec!["titulo", "contenido"])
        })?;

        let post = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        tracing::debug!(post_id = id, fields = changes.len(), "Post updated");
        Ok(post)
    }

    /// Delete a post and return its ID.
    pub async fn delete(&self, id: PostId) -> Result<PostId, DomainError> {
        let deleted = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::post_not_found(id))?;

        tracing::debug!(post_id = deleted, "Post deleted");
        Ok(deleted)
    }
}

/// An empty string counts as not supplied.
fn supplied(field: &'static str, value: Option<String>) -> Option<String> {
    match value {
        Some(value) if value.is_empty() => {
            tracing::debug!(field, "Empty value treated as absent");
            None
        }
        other => other,
    }
}
