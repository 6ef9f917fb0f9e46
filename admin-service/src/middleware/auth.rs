//! Request authorization.
//!
//! An [`AuthGate`] is an ordered list of [`CredentialVerifier`]s. Verifiers
//! run in order and the first one that recognises the request wins; later
//! verifiers are never consulted. A verifier that finds no usable credential
//! answers `Ok(None)`, while an infrastructure failure is an `Err` and aborts
//! the whole check.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;
use service_core::middleware::RequestId;
use std::sync::Arc;
use uuid::Uuid;

use crate::services::{key_codec, metrics, ApiKeyService, SessionManager};

/// Who a request was authorized as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Session { subject: String },
    ApiKey { key_id: Uuid },
}

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    async fn check(&self, headers: &HeaderMap) -> Result<Option<Principal>, AppError>;
}

/// Accepts a genuine session cookie.
pub struct SessionVerifier {
    sessions: SessionManager,
}

impl SessionVerifier {
    pub fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl CredentialVerifier for SessionVerifier {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn check(&self, headers: &HeaderMap) -> Result<Option<Principal>, AppError> {
        let jar = CookieJar::from_headers(headers);
        Ok(self
            .sessions
            .read_session(&jar)
            .map(|subject| Principal::Session { subject }))
    }
}

/// Accepts a valid API key from `X-API-Key` or `Authorization: Bearer`.
pub struct ApiKeyVerifier {
    api_keys: ApiKeyService,
}

impl ApiKeyVerifier {
    pub fn new(api_keys: ApiKeyService) -> Self {
        Self { api_keys }
    }
}

#[async_trait]
impl CredentialVerifier for ApiKeyVerifier {
    fn name(&self) -> &'static str {
        "api_key"
    }

    async fn check(&self, headers: &HeaderMap) -> Result<Option<Principal>, AppError> {
        let Some(candidate) = key_codec::extract_credential(headers) else {
            return Ok(None);
        };

        let verdict = self.api_keys.validate(Some(candidate)).await?;
        Ok(verdict.key_id().map(|key_id| Principal::ApiKey { key_id }))
    }
}

#[derive(Clone)]
pub struct AuthGate {
    name: &'static str,
    verifiers: Arc<Vec<Arc<dyn CredentialVerifier>>>,
}

impl AuthGate {
    pub fn new(name: &'static str, verifiers: Vec<Arc<dyn CredentialVerifier>>) -> Self {
        Self {
            name,
            verifiers: Arc::new(verifiers),
        }
    }

    /// Dashboard-only endpoints. API keys are deliberately not accepted here,
    /// so a leaked key cannot mint or revoke other keys.
    pub fn session_only(sessions: SessionManager) -> Self {
        Self::new("session_only", vec![Arc::new(SessionVerifier::new(sessions))])
    }

    /// Data endpoints: a session cookie, or failing that an API key.
    pub fn session_or_api_key(sessions: SessionManager, api_keys: ApiKeyService) -> Self {
        Self::new(
            "session_or_api_key",
            vec![
                Arc::new(SessionVerifier::new(sessions)),
                Arc::new(ApiKeyVerifier::new(api_keys)),
            ],
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// First principal any verifier recognises, in priority order.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Option<Principal>, AppError> {
        for verifier in self.verifiers.iter() {
            if let Some(principal) = verifier.check(headers).await? {
                tracing::debug!(gate = self.name, verifier = verifier.name(), "Request authorized");
                return Ok(Some(principal));
            }
        }
        Ok(None)
    }

    pub async fn is_authorized(&self, headers: &HeaderMap) -> Result<bool, AppError> {
        Ok(self.authorize(headers).await?.is_some())
    }
}

/// Route layer: `middleware::from_fn_with_state(gate, auth_gate_middleware)`.
pub async fn auth_gate_middleware(
    State(gate): State<AuthGate>,
    req: Request,
    next: Next,
) -> Response {
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "-".to_string());

    match gate.authorize(req.headers()).await {
        Ok(Some(principal)) => {
            tracing::debug!(
                gate = gate.name(),
                request_id = %request_id,
                principal = ?principal,
                method = %req.method(),
                path = %req.uri().path(),
                "Authorized request"
            );
            next.run(req).await
        }
        Ok(None) => {
            tracing::warn!(
                gate = gate.name(),
                request_id = %request_id,
                method = %req.method(),
                path = %req.uri().path(),
                "Rejected unauthenticated request"
            );
            metrics::record_auth_rejection(gate.name());
            AppError::Unauthorized(anyhow::anyhow!("No valid credential")).into_response()
        }
        Err(e) => {
            tracing::error!(
                gate = gate.name(),
                request_id = %request_id,
                error = %e,
                "Authorization check failed"
            );
            e.into_response()
        }
    }
}
