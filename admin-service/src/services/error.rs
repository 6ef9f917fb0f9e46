use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("API key not found")]
    ApiKeyNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Duplicate record: {0}")]
    Duplicate(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(anyhow::Error::new(e)),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::ApiKeyNotFound => AppError::NotFound(anyhow::anyhow!("API key not found")),
            ServiceError::CategoryNotFound => {
                AppError::NotFound(anyhow::anyhow!("Category not found"))
            }
            ServiceError::Duplicate(e) => AppError::Conflict(anyhow::anyhow!(e)),
        }
    }
}
