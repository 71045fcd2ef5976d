use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the store when a post is inserted.
pub type PostId = i32;

/// Post entity - a row of the `posts` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub titulo: String,
    pub contenido: String,
    pub usuario_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A validated post that has not been stored yet.
///
/// `id` and `created_at` are missing on purpose: the store assigns both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub titulo: String,
    pub contenido: String,
    pub usuario_id: i32,
}

/// A single column update applied by a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostField {
    Titulo(String),
    Contenido(String),
}

impl PostField {
    /// Column this field writes to.
    pub fn column(&self) -> &'static str {
        match self {
            PostField::Titulo(_) => "titulo",
            PostField::Contenido(_) => "contenido",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            PostField::Titulo(value) | PostField::Contenido(value) => value,
        }
    }

    /// Apply this field to an already loaded post.
    pub fn apply(&self, post: &mut Post) {
        match self {
            PostField::Titulo(value) => post.titulo = value.clone(),
            PostField::Contenido(value) => post.contenido = value.clone(),
        }
    }
}

/// Ordered, never empty set of field updates for one post.
///
/// Fields always come out as `titulo` first, then `contenido`, whatever order
/// the caller supplied them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChanges {
    fields: Vec<PostField>,
}

impl PostChanges {
    /// Build the change set from the supplied values.
    ///
    /// Returns `None` when neither field carries a value.
    pub fn new(titulo: Option<String>, contenido: Option<String>) -> Option<Self> {
        let fields: Vec<PostField> = [
            titulo.map(PostField::Titulo),
            contenido.map(PostField::Contenido),
        ]
        .into_iter()
        .flatten()
        .collect();

        if fields.is_empty() {
            None
        } else {
            Some(Self { fields })
        }
    }

    pub fn fields(&self) -> &[PostField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Apply every field to `post`, leaving the others untouched.
    pub fn apply(&self, post: &mut Post) {
        for field in &self.fields {
            field.apply(post);
        }
    }
}
