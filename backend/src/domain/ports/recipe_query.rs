//! Driving port for recipe reads relative to a viewer.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, RecipeDetail, RecipeId, RecipeListQuery, Viewer};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Detail projection of one recipe.
    async fn get(&self, viewer: Viewer, id: RecipeId) -> Result<RecipeDetail, Error>;

    /// Filtered, paginated listing.
    async fn list(
        &self,
        viewer: Viewer,
        query: &RecipeListQuery,
        request: PageRequest,
    ) -> Result<Page<RecipeDetail>, Error>;
}

/// Fixture holding no recipes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeQuery;

#[async_trait]
impl RecipeQuery for FixtureRecipeQuery {
    async fn get(&self, _viewer: Viewer, id: RecipeId) -> Result<RecipeDetail, Error> {
        Err(Error::not_found(format!("recipe {id} not found")))
    }

    async fn list(
        &self,
        _viewer: Viewer,
        _query: &RecipeListQuery,
        request: PageRequest,
    ) -> Result<Page<RecipeDetail>, Error> {
        Ok(Page::empty(request))
    }
}
