//! Recipe write and read services.
//!
//! Writes validate the draft in a fixed order (see
//! [`recipe_validation`](super::recipe_validation)), store the image, then
//! hand the whole aggregate to the repository in one call. Reads attach
//! viewer-relative flags; anonymous viewers never reach the ledger.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use serde_json::json;
use tracing::{debug, info};

use crate::domain::catalog_service::map_catalog_error;
use crate::domain::ledger_service::map_ledger_error;
use crate::domain::ports::{
    CatalogRepository, ImageStore, ImageStoreError, LedgerRepository, RecipeCommand, RecipeQuery,
    RecipeRepository, RecipeRepositoryError,
};
use crate::domain::recipe_validation::{
    CheckedFields, RecipeValidationError, check_composition, check_fields,
};
use crate::domain::{
    AuthorView, Error, IngredientId, NewRecipe, Recipe, RecipeChanges, RecipeDetail, RecipeDraft,
    RecipeFilter, RecipeId, RecipeListQuery, Relation, RelationKind, RelationTarget, UserId,
    Viewer,
};

/// Recipe service implementing [`RecipeCommand`] and [`RecipeQuery`].
#[derive(Clone)]
pub struct RecipeService<R, C, L, I> {
    recipes: Arc<R>,
    catalog: Arc<C>,
    ledger: Arc<L>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

/// Repositories and collaborators a [`RecipeService`] is built from.
pub struct RecipeServicePorts<R, C, L, I> {
    pub recipes: Arc<R>,
    pub catalog: Arc<C>,
    pub ledger: Arc<L>,
    pub images: Arc<I>,
    pub clock: Arc<dyn Clock>,
}

impl<R, C, L, I> RecipeService<R, C, L, I> {
    pub fn new(ports: RecipeServicePorts<R, C, L, I>) -> Self {
        let RecipeServicePorts {
            recipes,
            catalog,
            ledger,
            images,
            clock,
        } = ports;
        Self {
            recipes,
            catalog,
            ledger,
            images,
            clock,
        }
    }
}

pub(crate) fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipeRepositoryError::MissingReference { message } => Error::not_found(message),
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::InvalidPayload { message } => {
            Error::invalid_request(format!("invalid image: {message}"))
                .with_details(json!({ "field": "image" }))
        }
        ImageStoreError::Storage { message } => {
            Error::internal(format!("image storage failed: {message}"))
        }
    }
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

impl<R, C, L, I> RecipeService<R, C, L, I>
where
    R: RecipeRepository,
    C: CatalogRepository,
    L: LedgerRepository,
    I: ImageStore,
{
    /// Run every validation step, returning the fields to persist.
    async fn validate(&self, draft: &RecipeDraft) -> Result<CheckedFields, Error> {
        let checked = check_fields(draft)?;

        let mut seen = HashSet::new();
        let ingredient_ids: Vec<IngredientId> = checked
            .lines
            .iter()
            .map(|line| line.ingredient)
            .filter(|id| seen.insert(*id))
            .collect();
        let ingredients = self
            .catalog
            .ingredients_by_ids(&ingredient_ids)
            .await
            .map_err(map_catalog_error)?;
        let tags = self
            .catalog
            .tags_by_ids(&checked.tags)
            .await
            .map_err(map_catalog_error)?;

        check_composition(&checked.lines, &ingredients, &checked.tags, &tags)?;
        Ok(checked)
    }

    async fn load(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))
    }

    /// Load `id` and check that `actor` wrote it.
    async fn load_owned(&self, actor: UserId, id: RecipeId) -> Result<Recipe, Error> {
        let recipe = self.load(id).await?;
        if recipe.author_id() != Some(actor) {
            debug!(recipe = %id, actor = %actor, "non-author mutation rejected");
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        Ok(recipe)
    }

    async fn has_relation(&self, relation: Relation) -> Result<bool, Error> {
        self.ledger
            .exists(&relation)
            .await
            .map_err(map_ledger_error)
    }

    async fn detail_for(&self, viewer: Viewer, recipe: Recipe) -> Result<RecipeDetail, Error> {
        let Some(actor) = viewer.user_id() else {
            return Ok(RecipeDetail::anonymous(recipe));
        };
        let is_favourited = self
            .has_relation(Relation::favourite(actor, recipe.id))
            .await?;
        let is_in_cart = self.has_relation(Relation::cart(actor, recipe.id)).await?;
        let author = match recipe.author.clone() {
            Some(profile) => {
                let is_subscribed = profile.id != actor
                    && self.has_relation(Relation::follow(actor, profile.id)).await?;
                Some(AuthorView {
                    profile,
                    is_subscribed,
                })
            }
            None => None,
        };
        Ok(RecipeDetail {
            recipe,
            author,
            is_favourited,
            is_in_cart,
        })
    }

    async fn existing(
        &self,
        kind: RelationKind,
        actor: UserId,
        candidates: &[RelationTarget],
    ) -> Result<HashSet<RelationTarget>, Error> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }
        self.ledger
            .existing_targets(kind, actor, candidates)
            .await
            .map_err(map_ledger_error)
    }

    /// Attach flags to a whole page with one ledger query per relation kind.
    async fn details_for_page(
        &self,
        viewer: Viewer,
        page: Page<Recipe>,
    ) -> Result<Page<RecipeDetail>, Error> {
        let Some(actor) = viewer.user_id() else {
            return Ok(page.map(RecipeDetail::anonymous));
        };

        let recipe_targets: Vec<RelationTarget> = page
            .items()
            .iter()
            .map(|recipe| RelationTarget::Recipe(recipe.id))
            .collect();
        let mut seen = HashSet::new();
        let author_targets: Vec<RelationTarget> = page
            .items()
            .iter()
            .filter_map(Recipe::author_id)
            .filter(|author| *author != actor && seen.insert(*author))
            .map(RelationTarget::Author)
            .collect();

        let favourites = self
            .existing(RelationKind::Favourite, actor, &recipe_targets)
            .await?;
        let cart = self
            .existing(RelationKind::Cart, actor, &recipe_targets)
            .await?;
        let follows = self
            .existing(RelationKind::Follow, actor, &author_targets)
            .await?;

        Ok(page.map(|recipe| {
            let target = RelationTarget::Recipe(recipe.id);
            let author = recipe.author.clone().map(|profile| AuthorView {
                is_subscribed: follows.contains(&RelationTarget::Author(profile.id)),
                profile,
            });
            RecipeDetail {
                is_favourited: favourites.contains(&target),
                is_in_cart: cart.contains(&target),
                author,
                recipe,
            }
        }))
    }
}

#[async_trait]
impl<R, C, L, I> RecipeCommand for RecipeService<R, C, L, I>
where
    R: RecipeRepository,
    C: CatalogRepository,
    L: LedgerRepository,
    I: ImageStore,
{
    async fn create(&self, actor: UserId, draft: RecipeDraft) -> Result<RecipeDetail, Error> {
        let checked = self.validate(&draft).await?;
        let payload = draft.image.ok_or(RecipeValidationError::MissingImage)?;
        let image = self.images.store(&payload).await.map_err(map_image_error)?;

        let new_recipe = NewRecipe {
            author: actor,
            name: checked.name,
            text: checked.text,
            cooking_time: checked.cooking_time,
            image,
            lines: checked.lines,
            tags: checked.tags,
            pub_date: self.clock.utc(),
        };
        let id = self
            .recipes
            .create(&new_recipe)
            .await
            .map_err(map_recipe_error)?;
        info!(recipe = %id, author = %actor, "recipe created");

        let recipe = self.load(id).await?;
        self.detail_for(Viewer::Authenticated(actor), recipe).await
    }

    async fn update(
        &self,
        actor: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeDetail, Error> {
        self.load_owned(actor, id).await?;
        let checked = self.validate(&draft).await?;
        let image = match draft.image {
            Some(payload) => Some(self.images.store(&payload).await.map_err(map_image_error)?),
            None => None,
        };

        let changes = RecipeChanges {
            name: checked.name,
            text: checked.text,
            cooking_time: checked.cooking_time,
            image,
            lines: checked.lines,
            tags: checked.tags,
        };
        let replaced = self
            .recipes
            .replace(id, &changes)
            .await
            .map_err(map_recipe_error)?;
        if !replaced {
            return Err(recipe_not_found(id));
        }
        info!(recipe = %id, "recipe replaced");

        let recipe = self.load(id).await?;
        self.detail_for(Viewer::Authenticated(actor), recipe).await
    }

    async fn delete(&self, actor: UserId, id: RecipeId) -> Result<(), Error> {
        self.load_owned(actor, id).await?;
        let deleted = self.recipes.delete(id).await.map_err(map_recipe_error)?;
        if !deleted {
            return Err(recipe_not_found(id));
        }
        info!(recipe = %id, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, C, L, I> RecipeQuery for RecipeService<R, C, L, I>
where
    R: RecipeRepository,
    C: CatalogRepository,
    L: LedgerRepository,
    I: ImageStore,
{
    async fn get(&self, viewer: Viewer, id: RecipeId) -> Result<RecipeDetail, Error> {
        let recipe = self.load(id).await?;
        self.detail_for(viewer, recipe).await
    }

    async fn list(
        &self,
        viewer: Viewer,
        query: &RecipeListQuery,
        request: PageRequest,
    ) -> Result<Page<RecipeDetail>, Error> {
        let filter = RecipeFilter::resolve(query, viewer);
        let page = self
            .recipes
            .list(&filter, request)
            .await
            .map_err(map_recipe_error)?;
        self.details_for_page(viewer, page).await
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
