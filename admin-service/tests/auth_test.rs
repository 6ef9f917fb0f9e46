//! Dashboard login, logout and session status.

mod common;

use axum::http::{Method, StatusCode};
use common::{test_config, TestApp};
use secrecy::Secret;
use serde_json::json;

#[tokio::test]
async fn login_sets_a_signed_session_cookie() {
    let app = TestApp::new().await;

    let response = app.send(Method::POST, "/api/auth/login", &[], None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);

    let set_cookie = response.set_cookie().expect("Set-Cookie");
    assert!(set_cookie.starts_with("session=default."));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(set_cookie.contains("Path=/"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn session_status_follows_login_and_logout() {
    let app = TestApp::new().await;

    let anonymous = app.send(Method::GET, "/api/auth/session", &[], None).await;
    assert_eq!(anonymous.body, json!({ "authenticated": false }));

    let cookie = app.login().await;
    let status = app
        .send(Method::GET, "/api/auth/session", &[("cookie", cookie.as_str())], None)
        .await;
    assert_eq!(status.body, json!({ "authenticated": true }));

    let logout = app
        .send(Method::POST, "/api/auth/logout", &[("cookie", cookie.as_str())], None)
        .await;
    assert_eq!(logout.status, StatusCode::OK);
    let cleared = logout.set_cookie().expect("Set-Cookie");
    assert!(cleared.starts_with("session=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn logout_without_a_session_succeeds() {
    let app = TestApp::new().await;
    let response = app.send(Method::POST, "/api/auth/logout", &[], None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn forged_cookie_is_not_a_session() {
    let app = TestApp::new().await;

    for cookie in ["session=default", "session=default.deadbeef", "session=x"] {
        let status = app
            .send(Method::GET, "/api/auth/session", &[("cookie", cookie)], None)
            .await;
        assert_eq!(status.body, json!({ "authenticated": false }));

        let keys = app
            .send(Method::GET, "/api/api-keys", &[("cookie", cookie)], None)
            .await;
        assert_eq!(keys.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn session_passes_even_with_a_bogus_api_key() {
    let app = TestApp::new().await;
    let cookie = app.login().await;

    let response = app
        .send(
            Method::GET,
            "/api/categories",
            &[("cookie", cookie.as_str()), ("x-api-key", "crs_bogus")],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn configured_password_is_enforced() {
    let mut config = test_config();
    config.session.admin_password = Some(Secret::new("hunter2-but-longer".to_string()));
    let app = TestApp::with_config(config).await;

    let missing = app.send(Method::POST, "/api/auth/login", &[], None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body, json!({ "error": "Unauthorized" }));
    assert!(missing.set_cookie().is_none());

    let wrong = app
        .send(
            Method::POST,
            "/api/auth/login",
            &[],
            Some(json!({ "password": "hunter2" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let right = app
        .send(
            Method::POST,
            "/api/auth/login",
            &[],
            Some(json!({ "password": "hunter2-but-longer" })),
        )
        .await;
    assert_eq!(right.status, StatusCode::OK);
    assert!(right.session_cookie().is_some());
}

#[tokio::test]
async fn secure_flag_follows_configuration() {
    let mut config = test_config();
    config.session.cookie_secure = admin_service::config::CookieSecure::Always;
    let app = TestApp::with_config(config).await;

    let response = app.send(Method::POST, "/api/auth/login", &[], None).await;
    assert!(response.set_cookie().unwrap().contains("Secure"));
}

#[tokio::test]
async fn health_and_openapi_are_public() {
    let app = TestApp::new().await;

    let health = app.send(Method::GET, "/health", &[], None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");
    assert!(health.headers.contains_key("x-request-id"));

    let openapi = app
        .send(Method::GET, "/.well-known/openapi.json", &[], None)
        .await;
    assert_eq!(openapi.status, StatusCode::OK);
    assert!(openapi.body["paths"]["/api/api-keys"].is_object());
}

#[tokio::test]
async fn wildcard_origin_is_refused_without_breaking_the_router() {
    let mut config = test_config();
    config.security.allowed_origins = vec!["*".to_string(), "http://localhost:3000".to_string()];
    assert!(config.validate().is_err());

    let app = TestApp::with_config(config).await;
    let health = app
        .send(
            Method::GET,
            "/health",
            &[("origin", "http://localhost:3000")],
            None,
        )
        .await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(
        health.headers["access-control-allow-origin"],
        "http://localhost:3000"
    );

    let foreign = app
        .send(Method::GET, "/health", &[("origin", "http://evil.test")], None)
        .await;
    assert!(!foreign.headers.contains_key("access-control-allow-origin"));
}
