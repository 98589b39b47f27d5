//! Store-backed drink CRUD over the real router.
//!
//! Each case gets a fresh migrated database from `#[sqlx::test]` (requires
//! DATABASE_URL pointing at a Postgres server), with the JWKS endpoint
//! mocked and tokens signed for real, so the whole path runs: guard,
//! handler, store.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use httpmock::prelude::*;
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{assert_error_body, bearer, send, test_app};

fn json_req(method: Method, uri: &str, scope: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer(scope))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn matcha_recipe() -> Value {
    json!([
        {"name": "matcha", "color": "green", "parts": 1},
        {"name": "milk", "color": "white", "parts": 3},
    ])
}

async fn create_drink(app: &Router, title: &str) -> i64 {
    let req = json_req(
        Method::POST,
        "/drinks",
        "post:drinks",
        &json!({"title": title, "recipe": matcha_recipe()}),
    );
    let (status, body) = send(app.clone(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    body["drinks"][0]["id"].as_i64().unwrap()
}

#[sqlx::test]
async fn created_drink_is_listed_in_both_projections(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    let id = create_drink(&app, "Matcha Latte").await;

    // Public short listing: color/parts only, no ingredient names.
    let req = Request::builder()
        .uri("/drinks")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), req).await;

    assert_eq!(status, StatusCode::OK);
    let drink = &body["drinks"][0];
    assert_eq!(drink["id"], id);
    assert_eq!(drink["title"], "Matcha Latte");
    for ingredient in drink["recipe"].as_array().unwrap() {
        assert!(ingredient.get("name").is_none());
        assert!(ingredient.get("color").is_some());
    }

    // Authorized detail listing carries the full recipe.
    let req = Request::builder()
        .uri("/drinks-detail")
        .header(header::AUTHORIZATION, bearer("get:drinks-detail"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "matcha");
    assert_eq!(body["drinks"][0]["recipe"][1]["parts"], 3);
}

#[sqlx::test]
async fn duplicate_title_is_422(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    create_drink(&app, "Flat White").await;

    let req = json_req(
        Method::POST,
        "/drinks",
        "post:drinks",
        &json!({"title": "Flat White", "recipe": matcha_recipe()}),
    );
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_body(status, &body);
}

#[sqlx::test]
async fn patch_updates_only_the_given_fields(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    let id = create_drink(&app, "Matcha Latte").await;

    let req = json_req(
        Method::PATCH,
        &format!("/drinks/{id}"),
        "patch:drinks",
        &json!({"title": "Iced Matcha Latte"}),
    );
    let (status, body) = send(app.clone(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"][0]["title"], "Iced Matcha Latte");
    // Recipe untouched by a title-only patch.
    assert_eq!(body["drinks"][0]["recipe"][0]["name"], "matcha");

    // And the change is persisted, not just echoed.
    let req = Request::builder()
        .uri("/drinks")
        .body(Body::empty())
        .unwrap();
    let (_, body) = send(app, req).await;
    assert_eq!(body["drinks"][0]["title"], "Iced Matcha Latte");
}

#[sqlx::test]
async fn patch_unknown_id_is_404(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    let req = json_req(
        Method::PATCH,
        "/drinks/999999",
        "patch:drinks",
        &json!({"title": "Renamed"}),
    );
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(status, &body);
}

#[sqlx::test]
async fn patch_unknown_id_with_empty_body_is_404(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    // The row lookup runs first, so the unknown id wins over the bad body.
    let req = json_req(Method::PATCH, "/drinks/999999", "patch:drinks", &json!({}));
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(status, &body);
}

#[sqlx::test]
async fn patch_known_id_with_empty_body_is_422(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    let id = create_drink(&app, "Matcha Latte").await;

    let req = json_req(
        Method::PATCH,
        &format!("/drinks/{id}"),
        "patch:drinks",
        &json!({}),
    );
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_body(status, &body);
}

#[sqlx::test]
async fn delete_unknown_id_is_404(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    let req = Request::builder()
        .method(Method::DELETE)
        .uri("/drinks/999999")
        .header(header::AUTHORIZATION, bearer("delete:drinks"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_body(status, &body);
}

#[sqlx::test]
async fn delete_removes_the_drink(db: PgPool) {
    let server = MockServer::start_async().await;
    let app = test_app(&server, db).await;

    let id = create_drink(&app, "Matcha Latte").await;

    let req = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/drinks/{id}"))
        .header(header::AUTHORIZATION, bearer("delete:drinks"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app.clone(), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["delete"], id);

    let req = Request::builder()
        .uri("/drinks")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drinks"].as_array().unwrap().len(), 0);
}
