use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Login body. The password is only checked when one is configured.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionStatusResponse {
    pub authenticated: bool,
}
