pub mod api_key;
pub mod category;

pub use api_key::ApiKey;
pub use category::{Category, CategoryChanges};
