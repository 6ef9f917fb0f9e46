//! HTTP handlers for admin-service.

pub mod api_keys;
pub mod auth;
pub mod categories;
pub mod metrics;

pub use api_keys::*;
pub use auth::*;
pub use categories::*;
