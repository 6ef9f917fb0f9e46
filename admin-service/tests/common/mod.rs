//! Shared helpers for admin-service integration tests.
//!
//! Every test gets its own router over a fresh in-memory store.

#![allow(dead_code)]

use admin_service::{
    build_router,
    config::{AdminConfig, CookieSecure, DatabaseConfig, SecurityConfig, SessionConfig},
    services::MockStore,
    AppState,
};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::{Config, Environment};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SIGNING_KEY: &str = "integration-test-signing-key-0123456789";

pub fn test_config() -> AdminConfig {
    AdminConfig {
        common: Config { port: 8080 },
        environment: Environment::Dev,
        service_name: "admin-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        database: DatabaseConfig {
            url: Secret::new("postgres://unused".to_string()),
            max_connections: 1,
            min_connections: 1,
        },
        session: SessionConfig {
            signing_key: Secret::new(TEST_SIGNING_KEY.to_string()),
            cookie_secure: CookieSecure::Auto,
            admin_password: None,
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` pair of the first Set-Cookie header, ready to send back.
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|pair| pair.trim().to_string())
    }

    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MockStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AdminConfig) -> Self {
        let store = Arc::new(MockStore::new());
        let state = AppState::new(config, store.clone());
        let router = build_router(state).await.expect("router");
        Self { router, store }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Log in and return the `session=...` cookie pair.
    pub async fn login(&self) -> String {
        let response = self
            .send(Method::POST, "/api/auth/login", &[], None)
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.session_cookie().expect("session cookie")
    }

    /// Create an API key through the dashboard and return the creation body.
    pub async fn create_api_key(&self, cookie: &str, body: Value) -> Value {
        let response = self
            .send(
                Method::POST,
                "/api/api-keys",
                &[("cookie", cookie)],
                Some(body),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}
