//! Read-side port for the ingredient and tag catalog.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, IngredientSearch, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading catalog rows.
    pub enum CatalogRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "catalog read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query =>
            "catalog read query failed: {message}",
    }
}

/// Port for reading catalog rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All tags ordered by id.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogRepositoryError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogRepositoryError>;

    /// Tags whose ids appear in `ids`. Unknown ids are silently skipped.
    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, CatalogRepositoryError>;

    /// Ingredients matching `search`, ordered by name.
    async fn list_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogRepositoryError>;

    /// Ingredients whose ids appear in `ids`. Unknown ids are silently skipped.
    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError>;
}

/// Fixture implementation for tests that do not exercise catalog reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogRepository;

#[async_trait]
impl CatalogRepository for FixtureCatalogRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_tag(&self, _id: TagId) -> Result<Option<Tag>, CatalogRepositoryError> {
        Ok(None)
    }

    async fn tags_by_ids(&self, _ids: &[TagId]) -> Result<Vec<Tag>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_ingredients(
        &self,
        _search: &IngredientSearch,
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_ingredient(
        &self,
        _id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogRepositoryError> {
        Ok(None)
    }

    async fn ingredients_by_ids(
        &self,
        _ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError> {
        Ok(Vec::new())
    }
}
