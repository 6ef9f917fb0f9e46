pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post, put},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics_middleware, request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::config::{AdminConfig, WILDCARD_ORIGIN};
use crate::middleware::{auth_gate_middleware, AuthGate};
use crate::services::{
    key_codec::API_KEY_HEADER, session::SESSION_COOKIE_NAME, ApiKeyService, CategoryService,
    SecretStore, SessionManager,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::session_status,
        handlers::api_keys::list_api_keys,
        handlers::api_keys::create_api_key,
        handlers::api_keys::update_api_key,
        handlers::api_keys::delete_api_key,
        handlers::categories::list_categories,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::MessageResponse,
            dtos::auth::LoginRequest,
            dtos::auth::SessionStatusResponse,
            dtos::api_key::CreateApiKeyRequest,
            dtos::api_key::UpdateApiKeyRequest,
            dtos::api_key::ApiKeyResponse,
            dtos::api_key::CreateApiKeyResponse,
            dtos::category::CreateCategoryRequest,
            dtos::category::UpdateCategoryRequest,
            models::Category,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Dashboard session login and logout"),
        (name = "API Keys", description = "API key issuance and revocation (session only)"),
        (name = "Categories", description = "Category CRUD (session or API key)"),
        (name = "Observability", description = "Service health and monitoring"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE_NAME))),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
            components.add_security_scheme(
                "bearer_api_key",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AdminConfig>,
    pub store: Arc<dyn SecretStore>,
    pub sessions: SessionManager,
    pub api_keys: ApiKeyService,
    pub categories: CategoryService,
    /// Dashboard-only endpoints.
    pub session_gate: AuthGate,
    /// Data endpoints reachable by session or API key.
    pub data_gate: AuthGate,
}

impl AppState {
    pub fn new(config: AdminConfig, store: Arc<dyn SecretStore>) -> Self {
        let sessions = SessionManager::new(
            config.session.signing_key.clone(),
            config.secure_cookie(),
        );
        let api_keys = ApiKeyService::new(store.clone());
        let categories = CategoryService::new(store.clone());

        Self {
            session_gate: AuthGate::session_only(sessions.clone()),
            data_gate: AuthGate::session_or_api_key(sessions.clone(), api_keys.clone()),
            config: Arc::new(config),
            store,
            sessions,
            api_keys,
            categories,
        }
    }
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Managing keys with a key is not allowed.
    let api_key_routes = Router::new()
        .route(
            "/api/api-keys",
            get(handlers::list_api_keys).post(handlers::create_api_key),
        )
        .route(
            "/api/api-keys/:id",
            patch(handlers::update_api_key).delete(handlers::delete_api_key),
        )
        .route_layer(from_fn_with_state(
            state.session_gate.clone(),
            auth_gate_middleware,
        ));

    let category_routes = Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/categories/:id",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route_layer(from_fn_with_state(
            state.data_gate.clone(),
            auth_gate_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::session_status))
        .merge(api_key_routes)
        .merge(category_routes)
        .with_state(state.clone())
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer(&state.config.security.allowed_origins));

    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| {
            if origin == WILDCARD_ORIGIN {
                tracing::error!("Wildcard CORS origin cannot be combined with credentials. Skipping.");
                return None;
            }
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                    None
                }
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(API_KEY_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 500, description = "Store unreachable")
    ),
    tag = "Observability"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.store.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Store health check failed");
        AppError::from(e)
    })?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "checks": {
            "database": "up"
        }
    })))
}
