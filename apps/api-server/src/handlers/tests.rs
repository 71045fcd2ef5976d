use std::sync::Arc;

use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use posts_core::RepoError;
use posts_core::domain::{NewPost, Post, PostChanges, PostId};
use posts_core::ports::PostRepository;
use posts_infra::database::InMemoryPostRepository;

use crate::state::AppState;

/// Repository whose every call fails like an unreachable database.
struct UnreachableRepo;

#[async_trait]
impl PostRepository for UnreachableRepo {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        Err(unreachable_db())
    }

    async fn find_by_id(&self, _id: PostId) -> Result<Option<Post>, RepoError> {
        Err(unreachable_db())
    }

    async fn insert(&self, _post: NewPost) -> Result<Post, RepoError> {
        Err(unreachable_db())
    }

    async fn update(&self, _id: PostId, _changes: &PostChanges) -> Result<Option<Post>, RepoError> {
        Err(unreachable_db())
    }

    async fn delete(&self, _id: PostId) -> Result<Option<PostId>, RepoError> {
        Err(unreachable_db())
    }
}

fn unreachable_db() -> RepoError {
    RepoError::Connection("password authentication failed for user \"posts\"".to_string())
}

macro_rules! app {
    ($repo:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::with_repository(Arc::new($repo))))
                .configure(super::configure_routes)
                .default_service(web::to(super::not_found)),
        )
        .await
    };
}

#[actix_web::test]
async fn health_reports_ok_without_touching_the_store() {
    let app = app!(UnreachableRepo);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "ok": true }));
}

#[actix_web::test]
async fn full_post_lifecycle() {
    let app = app!(InMemoryPostRepository::new());

    // Create
    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "titulo": "Hello", "contenido": "World", "usuario_id": 7 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["titulo"], "Hello");
    assert_eq!(created["usuario_id"], 7);
    assert!(created["created_at"].is_string());

    // Read back
    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, created);

    // Unknown id
    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/posts/999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Post no encontrado" }));

    // Partial update
    let req = test::TestRequest::put()
        .uri("/posts/1")
        .set_json(json!({ "contenido": "World!" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["titulo"], "Hello");
    assert_eq!(updated["contenido"], "World!");
    assert_eq!(updated["usuario_id"], 7);
    assert_eq!(updated["created_at"], created["created_at"]);

    // Delete
    let resp =
        test::call_service(&app, test::TestRequest::delete().uri("/posts/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "ok": true, "id": 1 }));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp =
        test::call_service(&app, test::TestRequest::delete().uri("/posts/1").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_without_usuario_id_is_rejected_and_not_stored() {
    let app = app!(InMemoryPostRepository::new());

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "titulo": "T", "contenido": "C" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "error": "titulo, contenido y usuario_id son obligatorios",
            "fields": ["usuario_id"]
        })
    );

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request()).await;
    let posts: Vec<Value> = test::read_body_json(resp).await;
    assert!(posts.is_empty());
}

#[actix_web::test]
async fn update_without_fields_is_rejected() {
    let app = app!(InMemoryPostRepository::new());
    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "titulo": "T", "contenido": "C", "usuario_id": 1 }))
        .to_request();
    test::call_service(&app, req).await;

    for body in [json!({}), json!({ "titulo": null, "contenido": "" })] {
        let req = test::TestRequest::put()
            .uri("/posts/1")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Nada que actualizar (titulo o contenido)");
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/1").to_request()).await;
    let post: Value = test::read_body_json(resp).await;
    assert_eq!(post["titulo"], "T");
    assert_eq!(post["contenido"], "C");
}

#[actix_web::test]
async fn update_of_missing_post_is_not_found() {
    let app = app!(InMemoryPostRepository::new());

    let req = test::TestRequest::put()
        .uri("/posts/5")
        .set_json(json!({ "titulo": "T" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn list_returns_newest_first() {
    let app = app!(InMemoryPostRepository::new());
    for titulo in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(json!({ "titulo": titulo, "contenido": "C", "usuario_id": 1 }))
            .to_request();
        test::call_service(&app, req).await;
    }

    let resp = test::call_service(&app, test::TestRequest::get().uri("/posts").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let posts: Vec<Value> = test::read_body_json(resp).await;
    let titles: Vec<_> = posts.iter().map(|p| p["titulo"].as_str().unwrap()).collect();
    assert_eq!(titles, ["third", "second", "first"]);
}

#[actix_web::test]
async fn store_failures_return_generic_messages() {
    let app = app!(UnreachableRepo);

    let cases = [
        (test::TestRequest::get().uri("/posts"), "Error al listar posts"),
        (test::TestRequest::get().uri("/posts/1"), "Error al obtener post"),
        (
            test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({ "titulo": "T", "contenido": "C", "usuario_id": 1 })),
            "Error al crear post",
        ),
        (
            test::TestRequest::put()
                .uri("/posts/1")
                .set_json(json!({ "titulo": "T" })),
            "Error al actualizar post",
        ),
        (test::TestRequest::delete().uri("/posts/1"), "Error al eliminar post"),
    ];

    for (req, message) in cases {
        let resp = test::call_service(&app, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": message }));
    }
}

#[actix_web::test]
async fn validation_runs_before_the_store_is_reached() {
    let app = app!(UnreachableRepo);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "titulo": "", "contenido": "C", "usuario_id": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_input_maps_to_json_errors() {
    let app = app!(InMemoryPostRepository::new());

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/posts/abc").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "id inválido" }));

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({ "titulo": "T", "contenido": "C", "usuario_id": "siete" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("JSON inválido"));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "error": "Ruta no encontrada" }));
}

#[actix_web::test]
async fn cross_origin_browser_requests_are_allowed() {
    let app = test::init_service(
        App::new()
            .wrap(crate::middleware::cors::cors_layer())
            .app_data(web::Data::new(AppState::with_repository(Arc::new(
                InMemoryPostRepository::new(),
            ))))
            .configure(super::configure_routes),
    )
    .await;
    let origin = "http://localhost:5173";

    let preflight = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/posts")
        .insert_header((header::ORIGIN, origin))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, preflight).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        origin
    );

    let req = test::TestRequest::get()
        .uri("/posts")
        .insert_header((header::ORIGIN, origin))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        origin
    );
}
