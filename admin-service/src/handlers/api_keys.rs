use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::{
        api_key::{ApiKeyResponse, CreateApiKeyRequest, CreateApiKeyResponse, UpdateApiKeyRequest},
        ErrorResponse, MessageResponse,
    },
    utils::ValidatedJson,
    AppState,
};

/// List API keys, newest first
#[utoipa::path(
    get,
    path = "/api/api-keys",
    responses(
        (status = 200, description = "API keys without secrets", body = [ApiKeyResponse]),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "API Keys",
    security(("session_cookie" = []))
)]
pub async fn list_api_keys(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let keys = state.api_keys.list().await?;
    Ok(Json(keys))
}

/// Issue a new API key
///
/// The plaintext secret is returned in this response only.
#[utoipa::path(
    post,
    path = "/api/api-keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "API key created", body = CreateApiKeyResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "API Keys",
    security(("session_cookie" = []))
)]
pub async fn create_api_key(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.api_keys.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Activate or deactivate an API key
#[utoipa::path(
    patch,
    path = "/api/api-keys/{id}",
    params(("id" = Uuid, Path, description = "API key id")),
    request_body = UpdateApiKeyRequest,
    responses(
        (status = 200, description = "API key updated", body = ApiKeyResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "API key not found", body = ErrorResponse)
    ),
    tag = "API Keys",
    security(("session_cookie" = []))
)]
pub async fn update_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateApiKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let key = state.api_keys.set_active(id, req.active).await?;
    Ok(Json(key))
}

/// Delete an API key
#[utoipa::path(
    delete,
    path = "/api/api-keys/{id}",
    params(("id" = Uuid, Path, description = "API key id")),
    responses(
        (status = 200, description = "API key deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "API key not found", body = ErrorResponse)
    ),
    tag = "API Keys",
    security(("session_cookie" = []))
)]
pub async fn delete_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.api_keys.delete(id).await?;
    Ok(Json(MessageResponse::ok("API key deleted")))
}
