use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::api_key::{ApiKeyResponse, CreateApiKeyRequest, CreateApiKeyResponse};
use crate::models::ApiKey;
use crate::services::key_codec::{generate_secret, hash_secret};
use crate::services::metrics;
use crate::services::{SecretStore, ServiceError};

/// Why a presented API key was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Missing,
    UnknownKey,
    Inactive,
    Expired,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Missing => "missing",
            RejectReason::UnknownKey => "unknown_key",
            RejectReason::Inactive => "inactive",
            RejectReason::Expired => "expired",
        }
    }
}

/// Outcome of a single validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyVerdict {
    Valid { key_id: Uuid },
    Invalid(RejectReason),
}

impl ApiKeyVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ApiKeyVerdict::Valid { .. })
    }

    pub fn key_id(&self) -> Option<Uuid> {
        match self {
            ApiKeyVerdict::Valid { key_id } => Some(*key_id),
            ApiKeyVerdict::Invalid(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct ApiKeyService {
    store: Arc<dyn SecretStore>,
}

impl ApiKeyService {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Issue a new key. The returned response is the only place the secret appears.
    pub async fn create(
        &self,
        req: CreateApiKeyRequest,
    ) -> Result<CreateApiKeyResponse, ServiceError> {
        let secret = generate_secret();
        let key = ApiKey::new(req.name, hash_secret(&secret), req.expires_at);

        self.store.insert_api_key(&key).await?;
        metrics::record_key_created();

        tracing::info!(
            key_id = %key.id,
            name = %key.name,
            expires_at = ?key.expires_at,
            "API key created"
        );

        Ok(CreateApiKeyResponse::new(key, secret))
    }

    pub async fn list(&self) -> Result<Vec<ApiKeyResponse>, ServiceError> {
        let keys = self.store.list_api_keys().await?;
        Ok(keys.into_iter().map(ApiKeyResponse::from).collect())
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<ApiKeyResponse, ServiceError> {
        let key = self
            .store
            .set_api_key_active(id, active)
            .await?
            .ok_or(ServiceError::ApiKeyNotFound)?;

        tracing::info!(key_id = %key.id, name = %key.name, active, "API key toggled");
        Ok(key.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.store.delete_api_key(id).await? {
            return Err(ServiceError::ApiKeyNotFound);
        }

        tracing::info!(key_id = %id, "API key deleted");
        Ok(())
    }

    /// Decide whether `candidate` is a usable API key.
    ///
    /// Checks run in a fixed order: presence, hash lookup, active flag, expiry.
    /// Only when all pass is `lastUsedAt` written, and a failed write does not
    /// change the verdict. Store lookup failures are returned as errors rather
    /// than folded into `Invalid`.
    pub async fn validate(&self, candidate: Option<&str>) -> Result<ApiKeyVerdict, ServiceError> {
        let verdict = self.evaluate(candidate).await?;

        let outcome = match &verdict {
            ApiKeyVerdict::Valid { .. } => "valid",
            ApiKeyVerdict::Invalid(reason) => reason.as_str(),
        };
        metrics::record_validation(outcome);

        Ok(verdict)
    }

    async fn evaluate(&self, candidate: Option<&str>) -> Result<ApiKeyVerdict, ServiceError> {
        let Some(candidate) = candidate.filter(|c| !c.is_empty()) else {
            return Ok(ApiKeyVerdict::Invalid(RejectReason::Missing));
        };

        let secret_hash = hash_secret(candidate);
        let Some(key) = self.store.find_api_key_by_hash(&secret_hash).await? else {
            return Ok(ApiKeyVerdict::Invalid(RejectReason::UnknownKey));
        };

        if !key.active {
            tracing::debug!(key_id = %key.id, "Rejected inactive API key");
            return Ok(ApiKeyVerdict::Invalid(RejectReason::Inactive));
        }

        let now = Utc::now();
        if key.is_expired_at(now) {
            tracing::debug!(key_id = %key.id, "Rejected expired API key");
            return Ok(ApiKeyVerdict::Invalid(RejectReason::Expired));
        }

        if let Err(e) = self.store.touch_api_key(key.id, now).await {
            tracing::error!(key_id = %key.id, error = %e, "Failed to record API key usage");
            metrics::record_touch_failure();
        }

        Ok(ApiKeyVerdict::Valid { key_id: key.id })
    }
}
