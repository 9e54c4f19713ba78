//! Driving port for recipe writes.
//!
//! Every write names the acting user explicitly; only a recipe's author may
//! replace or delete it.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDetail, RecipeDraft, RecipeId, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Validate and store a new recipe authored by `actor`.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when a field or the composition is invalid.
    /// - `NotFound` when an ingredient or tag id is unknown.
    async fn create(&self, actor: UserId, draft: RecipeDraft) -> Result<RecipeDetail, Error>;

    /// Replace fields, composition and tags of `id`.
    ///
    /// # Errors
    ///
    /// As [`RecipeCommand::create`], plus `NotFound` for a missing recipe and
    /// `Forbidden` when `actor` is not the author.
    async fn update(
        &self,
        actor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeDetail, Error>;

    /// Delete `id`, cascading its lines and ledger entries.
    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error>;
}

/// Fixture that rejects every write.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeCommand;

#[async_trait]
impl RecipeCommand for FixtureRecipeCommand {
    async fn create(&self, _actor: UserId, _draft: RecipeDraft) -> Result<RecipeDetail, Error> {
        Err(Error::service_unavailable("recipe writes are not configured"))
    }

    async fn update(
        &self,
        _actor: UserId,
        _id: RecipeId,
        _draft: RecipeDraft,
    ) -> Result<RecipeDetail, Error> {
        Err(Error::service_unavailable("recipe writes are not configured"))
    }

    async fn delete(&self, _actor: UserId, _id: RecipeId) -> Result<(), Error> {
        Err(Error::service_unavailable("recipe writes are not configured"))
    }
}
