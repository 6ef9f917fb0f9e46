//! Services layer for admin-service.
//!
//! Credential handling (key codec, sessions), the record store seam and the
//! business logic behind each resource endpoint.

pub mod api_keys;
pub mod categories;
mod database;
pub mod error;
pub mod key_codec;
pub mod metrics;
pub mod session;
pub mod store;

pub use api_keys::{ApiKeyService, ApiKeyVerdict, RejectReason};
pub use categories::CategoryService;
pub use database::PgStore;
pub use error::ServiceError;
pub use session::SessionManager;
pub use store::{MockStore, SecretStore};
