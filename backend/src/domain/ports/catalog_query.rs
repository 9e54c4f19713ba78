//! Driving port for catalog reads.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, IngredientSearch, Tag, TagId};

/// Read access to tags and ingredients for inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>, Error>;

    /// Fails with `NotFound` for an unknown id.
    async fn tag(&self, id: TagId) -> Result<Tag, Error>;

    async fn list_ingredients(&self, search: &IngredientSearch) -> Result<Vec<Ingredient>, Error>;

    /// Fails with `NotFound` for an unknown id.
    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;
}

/// Fixture serving the two seed tags and a pair of ingredients.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogQuery;

impl FixtureCatalogQuery {
    fn tags() -> Vec<Tag> {
        vec![
            Tag {
                id: TagId::new(1),
                name: "суп".to_owned(),
                color: "#fff68f".to_owned(),
                slug: "soup".to_owned(),
            },
            Tag {
                id: TagId::new(2),
                name: "салат".to_owned(),
                color: "#a0db8e".to_owned(),
                slug: "salat".to_owned(),
            },
        ]
    }

    fn ingredients() -> Vec<Ingredient> {
        vec![
            Ingredient {
                id: IngredientId::new(1),
                name: "мука".to_owned(),
                measurement_unit: "г".to_owned(),
            },
            Ingredient {
                id: IngredientId::new(2),
                name: "яйцо".to_owned(),
                measurement_unit: "шт".to_owned(),
            },
        ]
    }
}

#[async_trait]
impl CatalogQuery for FixtureCatalogQuery {
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(Self::tags())
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        Self::tags()
            .into_iter()
            .find(|tag| tag.id == id)
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }

    async fn list_ingredients(&self, search: &IngredientSearch) -> Result<Vec<Ingredient>, Error> {
        Ok(Self::ingredients()
            .into_iter()
            .filter(|ingredient| search.matches(ingredient))
            .collect())
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        Self::ingredients()
            .into_iter()
            .find(|ingredient| ingredient.id == id)
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}
