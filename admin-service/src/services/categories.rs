use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::category::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::models::{Category, CategoryChanges};
use crate::services::{SecretStore, ServiceError};

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn SecretStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ServiceError> {
        self.store.list_categories().await
    }

    pub async fn create(&self, req: CreateCategoryRequest) -> Result<Category, ServiceError> {
        let category = Category::new(req.name, req.active);
        self.store.insert_category(&category).await?;

        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateCategoryRequest,
    ) -> Result<Category, ServiceError> {
        let changes = CategoryChanges::from(req);

        // Nothing to write; still report a missing record.
        if changes.is_empty() {
            return self
                .store
                .find_category(id)
                .await?
                .ok_or(ServiceError::CategoryNotFound);
        }

        let category = self
            .store
            .update_category(id, changes)
            .await?
            .ok_or(ServiceError::CategoryNotFound)?;

        tracing::info!(category_id = %category.id, "Category updated");
        Ok(category)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.store.delete_category(id).await? {
            return Err(ServiceError::CategoryNotFound);
        }

        tracing::info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
