//! PostgreSQL-backed catalog read adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CatalogRepository, CatalogRepositoryError};
use crate::domain::{Ingredient, IngredientId, IngredientSearch, Tag, TagId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, escape_like};
use super::models::{IngredientRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

diesel::define_sql_function! {
    /// SQL `lower(text)`.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed implementation of [`CatalogRepository`].
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogRepositoryError {
    CatalogRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogRepositoryError {
    match classify_diesel_error(error, "catalog read") {
        DieselFailure::Connection => CatalogRepositoryError::connection("database connection error"),
        DieselFailure::Query { message } => CatalogRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => {
            CatalogRepositoryError::query(format!("unexpected constraint violation: {constraint}"))
        }
    }
}

pub(crate) fn row_to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: IngredientId::new(row.id),
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

pub(crate) fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: TagId::new(row.id),
        name: row.name,
        color: row.color,
        slug: row.slug,
    }
}

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .select(TagRow::as_select())
            .order_by(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .find(id.get())
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_tag))
    }

    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, CatalogRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .filter(tags::id.eq_any(raw))
            .select(TagRow::as_select())
            .order_by(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    async fn list_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order_by((ingredients::name, ingredients::id))
            .into_boxed();
        if let Some(prefix) = search.prefix() {
            let pattern = format!("{}%", escape_like(prefix));
            query = query.filter(lower(ingredients::name).like(pattern));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_ingredient))
    }

    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq_any(raw))
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }
}
