//! Category CRUD behind the session-or-API-key gate.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn crud_round_trip_with_a_session() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    let auth = [("cookie", cookie.as_str())];

    let created = app
        .send(
            Method::POST,
            "/api/categories",
            &auth,
            Some(json!({ "name": "Books" })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["name"], "Books");
    assert_eq!(created.body["active"], true);
    assert!(created.body["createdAt"].is_string());
    let path = format!("/api/categories/{}", created.body["id"].as_str().unwrap());

    let updated = app
        .send(Method::PUT, &path, &auth, Some(json!({ "active": false })))
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], "Books");
    assert_eq!(updated.body["active"], false);

    let listed = app.send(Method::GET, "/api/categories", &auth, None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["active"], false);

    let deleted = app.send(Method::DELETE, &path, &auth, None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "success": true }));

    let listed = app.send(Method::GET, "/api/categories", &auth, None).await;
    assert!(listed.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn api_key_can_manage_categories() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    let key = app.create_api_key(&cookie, json!({ "name": "ci-bot" })).await;
    let secret = key["secret"].as_str().unwrap();

    let created = app
        .send(
            Method::POST,
            "/api/categories",
            &[("x-api-key", secret)],
            Some(json!({ "name": "Garden", "active": false })),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["active"], false);
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = TestApp::new().await;

    let list = app.send(Method::GET, "/api/categories", &[], None).await;
    assert_eq!(list.status, StatusCode::UNAUTHORIZED);
    assert_eq!(list.body, json!({ "error": "Unauthorized" }));

    let create = app
        .send(
            Method::POST,
            "/api/categories",
            &[("cookie", "session=default")],
            Some(json!({ "name": "Forged" })),
        )
        .await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.categories.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_bodies_are_validation_errors() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    let auth = [("cookie", cookie.as_str())];

    let empty_name = app
        .send(Method::POST, "/api/categories", &auth, Some(json!({ "name": "" })))
        .await;
    assert_eq!(empty_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty_name.body["error"], "Validation error");
    assert!(empty_name.body["details"]["name"].is_array());

    let too_long = app
        .send(
            Method::POST,
            "/api/categories",
            &auth,
            Some(json!({ "name": "x".repeat(256) })),
        )
        .await;
    assert_eq!(too_long.status, StatusCode::BAD_REQUEST);

    let wrong_type = app
        .send(
            Method::POST,
            "/api/categories",
            &auth,
            Some(json!({ "name": "Books", "active": "yes" })),
        )
        .await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_type.body["error"], "Validation error");
}

#[tokio::test]
async fn missing_categories_are_not_found() {
    let app = TestApp::new().await;
    let cookie = app.login().await;
    let auth = [("cookie", cookie.as_str())];
    let path = format!("/api/categories/{}", Uuid::new_v4());

    let update = app
        .send(Method::PUT, &path, &auth, Some(json!({ "name": "Nope" })))
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);
    assert_eq!(update.body["error"], "Category not found");

    let delete = app.send(Method::DELETE, &path, &auth, None).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .send(
            Method::DELETE,
            "/api/categories/not-a-uuid",
            &[("cookie", cookie.as_str())],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
