//! Port abstraction for recipe persistence.
//!
//! Adapters own the transaction boundary: `create` and `replace` write the
//! scalar fields, composition lines and tag links atomically.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeSummary, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "recipe repository query failed: {message}",
        /// A referenced ingredient, tag or author row vanished mid-write.
        MissingReference =>
            "recipe references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its composition and tags.
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError>;

    /// Overwrite a recipe's fields, composition and tags.
    ///
    /// Returns `false` when the recipe does not exist.
    async fn replace(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<bool, RecipeRepositoryError>;

    /// Returns `false` when the recipe does not exist.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeRepositoryError>;

    /// Filtered window of recipes, newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError>;

    /// Newest recipes by `author`, at most `limit` when given.
    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError>;

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError>;
}

/// Fixture implementation holding no recipes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeRepository;

#[async_trait]
impl RecipeRepository for FixtureRecipeRepository {
    async fn create(&self, _recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError> {
        Ok(RecipeId::new(1))
    }

    async fn replace(
        &self,
        _id: RecipeId,
        _changes: &RecipeChanges,
    ) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }

    async fn find(&self, _id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        Ok(None)
    }

    async fn find_summary(
        &self,
        _id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeRepositoryError> {
        Ok(None)
    }

    async fn list(
        &self,
        _filter: &RecipeFilter,
        request: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        Ok(Page::empty(request))
    }

    async fn summaries_by_author(
        &self,
        _author: UserId,
        _limit: Option<u32>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        Ok(Vec::new())
    }

    async fn count_by_author(&self, _author: UserId) -> Result<u64, RecipeRepositoryError> {
        Ok(0)
    }
}
