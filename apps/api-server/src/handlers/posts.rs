//! Post resource handlers.

use actix_web::{HttpResponse, web};

use posts_core::domain::PostId;
use posts_core::{CreatePost, UpdatePost};
use posts_shared::dto::{CreatePostRequest, DeleteResponse, UpdatePostRequest};

use crate::middleware::error::{AppResult, OrStoreFailure};
use crate::state::AppState;

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list()
        .await
        .or_store_failure("Error al listar posts")?;

    Ok(HttpResponse::Ok().json(posts))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .get(path.into_inner())
        .await
        .or_store_failure("Error al obtener post")?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .create(CreatePost {
            titulo: req.titulo,
            contenido: req.contenido,
            usuario_id: req.usuario_id,
        })
        .await
        .or_store_failure("Error al crear post")?;

    Ok(HttpResponse::Created().json(post))
}

/// PUT /posts/{id} - partial update of `titulo` and/or `contenido`
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let post = state
        .posts
        .update(
            path.into_inner(),
            UpdatePost {
                titulo: req.titulo.into_option(),
                contenido: req.contenido.into_option(),
            },
        )
        .await
        .or_store_failure("Error al actualizar post")?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> AppResult<HttpResponse> {
    let id = state
        .posts
        .delete(path.into_inner())
        .await
        .or_store_failure("Error al eliminar post")?;

    Ok(HttpResponse::Ok().json(DeleteResponse::deleted(id)))
}
