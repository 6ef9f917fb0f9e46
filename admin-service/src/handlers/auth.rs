use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::cookie::CookieJar;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use subtle::ConstantTimeEq;

use crate::{
    dtos::{
        auth::{LoginRequest, SessionStatusResponse},
        ErrorResponse, MessageResponse,
    },
    services::session::DEFAULT_SUBJECT,
    AppState,
};

/// Start a dashboard session
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body(content = LoginRequest, description = "Required only when an admin password is configured"),
    responses(
        (status = 200, description = "Session cookie issued", body = MessageResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<LoginRequest>>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(expected) = &state.config.session.admin_password {
        let presented = body
            .and_then(|Json(req)| req.password)
            .unwrap_or_default();

        let matches: bool = presented
            .as_bytes()
            .ct_eq(expected.expose_secret().as_bytes())
            .into();
        if !matches {
            tracing::warn!("Failed dashboard login attempt");
            return Err(AppError::Unauthorized(anyhow::anyhow!("Invalid password")));
        }
    }

    let jar = state.sessions.create_session(jar, DEFAULT_SUBJECT);
    Ok((jar, Json(MessageResponse::ok("Logged in successfully"))))
}

/// End the dashboard session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie removed", body = MessageResponse)
    ),
    tag = "Auth"
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = state.sessions.delete_session(jar);
    tracing::info!("Session ended");
    (jar, Json(MessageResponse::ok("Logged out successfully")))
}

/// Whether the caller holds a valid session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Session status", body = SessionStatusResponse)
    ),
    tag = "Auth"
)]
pub async fn session_status(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    Json(SessionStatusResponse {
        authenticated: state.sessions.is_authenticated(&jar),
    })
}
