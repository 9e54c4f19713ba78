//! Catalog read and bootstrap services.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    CatalogIngestionRepository, CatalogIngestionRepositoryError, CatalogQuery, CatalogRepository,
    CatalogRepositoryError,
};
use crate::domain::{
    Error, Ingredient, IngredientId, IngredientSearch, NewIngredient, NewTag, Tag, TagId,
};

/// Catalog read service implementing [`CatalogQuery`].
#[derive(Clone)]
pub struct CatalogService<R> {
    repo: Arc<R>,
}

impl<R> CatalogService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

pub(crate) fn map_catalog_error(error: CatalogRepositoryError) -> Error {
    match error {
        CatalogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalog repository unavailable: {message}"))
        }
        CatalogRepositoryError::Query { message } => {
            Error::internal(format!("catalog repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> CatalogQuery for CatalogService<R>
where
    R: CatalogRepository,
{
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        self.repo.list_tags().await.map_err(map_catalog_error)
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        self.repo
            .find_tag(id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn list_ingredients(&self, search: &IngredientSearch) -> Result<Vec<Ingredient>, Error> {
        self.repo
            .list_ingredients(search)
            .await
            .map_err(map_catalog_error)
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.repo
            .find_ingredient(id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}

/// Counts reported after a catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogLoadSummary {
    pub ingredients_inserted: usize,
    pub ingredients_skipped: usize,
    pub tags_inserted: usize,
    pub tags_skipped: usize,
}

/// Loads reference data with get-or-create semantics.
#[derive(Clone)]
pub struct CatalogIngestionService<R> {
    repo: Arc<R>,
}

impl<R> CatalogIngestionService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> CatalogIngestionService<R>
where
    R: CatalogIngestionRepository,
{
    fn map_ingestion_error(error: CatalogIngestionRepositoryError) -> Error {
        match error {
            CatalogIngestionRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("catalog ingestion unavailable: {message}"))
            }
            CatalogIngestionRepositoryError::Query { message } => {
                Error::internal(format!("catalog ingestion failed: {message}"))
            }
        }
    }

    /// Insert ingredients and tags not already present.
    pub async fn load(
        &self,
        ingredients: &[NewIngredient],
        tags: &[NewTag],
    ) -> Result<CatalogLoadSummary, Error> {
        let ingredients_inserted = self
            .repo
            .load_ingredients(ingredients)
            .await
            .map_err(Self::map_ingestion_error)?;
        let tags_inserted = self
            .repo
            .load_tags(tags)
            .await
            .map_err(Self::map_ingestion_error)?;

        let summary = CatalogLoadSummary {
            ingredients_inserted,
            ingredients_skipped: ingredients.len().saturating_sub(ingredients_inserted),
            tags_inserted,
            tags_skipped: tags.len().saturating_sub(tags_inserted),
        };
        info!(
            ingredients_inserted = summary.ingredients_inserted,
            ingredients_skipped = summary.ingredients_skipped,
            tags_inserted = summary.tags_inserted,
            tags_skipped = summary.tags_skipped,
            "catalog loaded"
        );
        Ok(summary)
    }
}
