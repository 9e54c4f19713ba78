//! PostgreSQL-backed catalog bootstrap adapter.
//!
//! Inserts use `ON CONFLICT DO NOTHING` against the natural keys, so
//! re-running a load never modifies existing rows and the affected-row count
//! is exactly the number of new rows.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{CatalogIngestionRepository, CatalogIngestionRepositoryError};
use crate::domain::{NewIngredient, NewTag};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewIngredientRow, NewTagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

/// Rows per `INSERT`, well inside PostgreSQL's bind parameter limit.
const INSERT_CHUNK: usize = 1_000;

/// Diesel-backed implementation of [`CatalogIngestionRepository`].
#[derive(Clone)]
pub struct DieselCatalogIngestionRepository {
    pool: DbPool,
}

impl DieselCatalogIngestionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogIngestionRepositoryError {
    CatalogIngestionRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogIngestionRepositoryError {
    match classify_diesel_error(error, "catalog ingestion") {
        DieselFailure::Connection => {
            CatalogIngestionRepositoryError::connection("database connection error")
        }
        DieselFailure::Query { message } => CatalogIngestionRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => {
            CatalogIngestionRepositoryError::query(format!("constraint violation: {constraint}"))
        }
    }
}

#[async_trait]
impl CatalogIngestionRepository for DieselCatalogIngestionRepository {
    async fn load_ingredients(
        &self,
        records: &[NewIngredient],
    ) -> Result<usize, CatalogIngestionRepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewIngredientRow<'_>> = records
            .iter()
            .map(|record| NewIngredientRow {
                name: record.name.as_str(),
                measurement_unit: record.measurement_unit.as_str(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    inserted += diesel::insert_into(ingredients::table)
                        .values(chunk)
                        .on_conflict((ingredients::name, ingredients::measurement_unit))
                        .do_nothing()
                        .execute(conn)
                        .await?;
                }
                Ok(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn load_tags(&self, records: &[NewTag]) -> Result<usize, CatalogIngestionRepositoryError> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewTagRow<'_>> = records
            .iter()
            .map(|record| NewTagRow {
                name: record.name.as_str(),
                color: record.color.as_str(),
                slug: record.slug.as_str(),
            })
            .collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tags::table)
            .values(&rows)
            .on_conflict(tags::slug)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
