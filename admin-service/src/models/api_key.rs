use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored API-key record.
///
/// Only the SHA-256 digest of the secret is persisted. The type deliberately
/// does not implement `Serialize`; responses go through the DTOs in
/// `dtos::api_key`, which have no hash or secret field to leak.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKey {
    pub id: Uuid,
    pub name: String,
    pub secret_hash: String,
    pub active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApiKey {
    pub fn new(name: String, secret_hash: String, expires_at: Option<DateTime<Utc>>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            secret_hash,
            active: true,
            expires_at,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// An expiry strictly before `now` disqualifies the key.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_keys_are_active_and_unused() {
        let key = ApiKey::new("ci-bot".to_string(), "ab".repeat(32), None);
        assert!(key.active);
        assert!(key.last_used_at.is_none());
        assert_eq!(key.created_at, key.updated_at);
    }

    #[test]
    fn expiry_is_only_checked_when_set() {
        let now = Utc::now();
        let mut key = ApiKey::new("ci-bot".to_string(), "ab".repeat(32), None);
        assert!(!key.is_expired_at(now));

        key.expires_at = Some(now - Duration::seconds(1));
        assert!(key.is_expired_at(now));

        key.expires_at = Some(now + Duration::hours(1));
        assert!(!key.is_expired_at(now));
    }
}
