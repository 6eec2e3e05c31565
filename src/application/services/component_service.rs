//! Component catalog service.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::entities::Component;
use crate::domain::paging::{Paging, normalize_filter};
use crate::domain::repositories::ComponentRepository;
use crate::error::AppError;

/// Field values for creating or replacing a component.
#[derive(Debug, Clone)]
pub struct ComponentInput {
    pub name: String,
    pub description: String,
    pub quantity: i32,
}

/// Creates, reads, updates and deletes catalog components.
pub struct ComponentService<R: ComponentRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ComponentRepository + ?Sized> ComponentService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a component.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when a field fails its guard.
    pub async fn create(&self, input: ComponentInput) -> Result<Component, AppError> {
        let component = Component::new(&input.name, &input.description, input.quantity)?;
        self.repository.insert(&component).await?;

        metrics::counter!("smt_entities_created_total", "kind" => Component::KIND).increment(1);
        info!(component_id = %component.id(), name = component.name(), "Component created");
        Ok(component)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the component does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Component, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn search(&self, name: Option<&str>, paging: Paging) -> Result<Vec<Component>, AppError> {
        self.repository.search(normalize_filter(name), paging).await
    }

    /// Replaces name, description and stock quantity.
    pub async fn update(&self, id: Uuid, input: ComponentInput) -> Result<Component, AppError> {
        let mut component = self.get(id).await?;
        component.update(&input.name, &input.description, input.quantity)?;
        self.repository.save(&component).await?;

        info!(component_id = %id, "Component updated");
        Ok(component)
    }

    /// Deletes a component and all of its placements.
    ///
    /// Returns `false` if the component did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            metrics::counter!("smt_entities_deleted_total", "kind" => Component::KIND).increment(1);
            info!(component_id = %id, "Component deleted");
        }
        Ok(deleted)
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found("Component not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockComponentRepository;

    fn input(name: &str, quantity: i32) -> ComponentInput {
        ComponentInput {
            name: name.to_string(),
            description: "Resistor 10k".to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn test_create_component_success() {
        let mut mock_repo = MockComponentRepository::new();
        mock_repo
            .expect_insert()
            .withf(|c| c.name() == "R_10K" && c.quantity() == 100)
            .times(1)
            .returning(|_| Ok(()));

        let service = ComponentService::new(Arc::new(mock_repo));
        let component = service.create(input("  R_10K ", 100)).await.unwrap();

        assert_eq!(component.name(), "R_10K");
        assert_eq!(component.description(), "Resistor 10k");
    }

    #[tokio::test]
    async fn test_create_component_invalid_does_not_touch_storage() {
        let mut mock_repo = MockComponentRepository::new();
        mock_repo.expect_insert().times(0);

        let service = ComponentService::new(Arc::new(mock_repo));

        let result = service.create(input("R_10K", 0)).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));

        let result = service.create(input("   ", 1)).await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_missing_component() {
        let mut mock_repo = MockComponentRepository::new();
        mock_repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = ComponentService::new(Arc::new(mock_repo));
        let result = service.get(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_component_saves_new_fields() {
        let existing = Component::new("R_10K", "", 10).unwrap();
        let id = existing.id();

        let mut mock_repo = MockComponentRepository::new();
        mock_repo
            .expect_find_by_id()
            .withf(move |i| *i == id)
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo
            .expect_save()
            .withf(|c| c.name() == "R_22K" && c.quantity() == 50)
            .times(1)
            .returning(|_| Ok(()));

        let service = ComponentService::new(Arc::new(mock_repo));
        let updated = service.update(id, input("R_22K", 50)).await.unwrap();

        assert_eq!(updated.id(), id);
        assert_eq!(updated.name(), "R_22K");
    }

    #[tokio::test]
    async fn test_search_normalizes_blank_filter() {
        let mut mock_repo = MockComponentRepository::new();
        mock_repo
            .expect_search()
            .withf(|name, paging| name.is_none() && paging.take == 50)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let service = ComponentService::new(Arc::new(mock_repo));
        let result = service.search(Some("   "), Paging::default()).await.unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let mut mock_repo = MockComponentRepository::new();
        mock_repo.expect_delete().times(1).returning(|_| Ok(false));

        let service = ComponentService::new(Arc::new(mock_repo));
        assert!(!service.delete(Uuid::new_v4()).await.unwrap());
    }
}
