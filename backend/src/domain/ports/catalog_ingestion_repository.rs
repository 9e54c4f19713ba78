//! Port abstraction for catalog bootstrap writes.
//!
//! Loading is get-or-create: rows that already exist are left untouched and
//! only new rows are counted.

use async_trait::async_trait;

use crate::domain::{NewIngredient, NewTag};

use super::define_port_error;

define_port_error! {
    /// Errors raised when loading catalog rows.
    pub enum CatalogIngestionRepositoryError {
        /// Repository connection could not be established.
        Connection =>
            "catalog ingestion connection failed: {message}",
        /// Query or mutation failed during execution.
        Query =>
            "catalog ingestion query failed: {message}",
    }
}

/// Port for writing catalog rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogIngestionRepository: Send + Sync {
    /// Insert ingredients missing by `(name, measurement_unit)`.
    ///
    /// Returns the number of rows inserted.
    async fn load_ingredients(
        &self,
        records: &[NewIngredient],
    ) -> Result<usize, CatalogIngestionRepositoryError>;

    /// Insert tags missing by slug.
    ///
    /// Returns the number of rows inserted.
    async fn load_tags(&self, records: &[NewTag]) -> Result<usize, CatalogIngestionRepositoryError>;
}

/// Fixture implementation that accepts and discards every row.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogIngestionRepository;

#[async_trait]
impl CatalogIngestionRepository for FixtureCatalogIngestionRepository {
    async fn load_ingredients(
        &self,
        _records: &[NewIngredient],
    ) -> Result<usize, CatalogIngestionRepositoryError> {
        Ok(0)
    }

    async fn load_tags(
        &self,
        _records: &[NewTag],
    ) -> Result<usize, CatalogIngestionRepositoryError> {
        Ok(0)
    }
}
