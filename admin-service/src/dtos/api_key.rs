use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::ApiKey;

/// Shown next to a freshly created secret.
pub const SECRET_SHOWN_ONCE_WARNING: &str =
    "Store this API key somewhere safe. It will not be shown again.";

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "ci-bot")]
    pub name: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateApiKeyRequest {
    pub active: bool,
}

/// API key as listed on the dashboard: no secret, no hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub id: Uuid,
    #[schema(example = "ci-bot")]
    pub name: String,
    pub active: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ApiKey> for ApiKeyResponse {
    fn from(key: ApiKey) -> Self {
        Self {
            id: key.id,
            name: key.name,
            active: key.active,
            last_used_at: key.last_used_at,
            expires_at: key.expires_at,
            created_at: key.created_at,
            updated_at: key.updated_at,
        }
    }
}

/// Creation response, the only place the plaintext secret is ever returned.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyResponse {
    pub id: Uuid,
    #[schema(example = "ci-bot")]
    pub name: String,
    #[schema(example = "crs_0123456789abcdef0123456789abcdef")]
    pub secret: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[schema(example = "Store this API key somewhere safe. It will not be shown again.")]
    pub message: String,
}

impl CreateApiKeyResponse {
    pub fn new(key: ApiKey, secret: String) -> Self {
        Self {
            id: key.id,
            name: key.name,
            secret,
            active: key.active,
            expires_at: key.expires_at,
            created_at: key.created_at,
            message: SECRET_SHOWN_ONCE_WARNING.to_string(),
        }
    }
}
