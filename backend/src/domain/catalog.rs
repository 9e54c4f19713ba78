//! Ingredient and tag reference data.
//!
//! Catalog rows are created by the bootstrap loader and never mutated by
//! request flows. Recipes reference them by id.

use serde::{Deserialize, Serialize};

use super::ids::{IngredientId, TagId};

/// An ingredient with the unit its amounts are measured in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// A recipe tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    /// Hex colour such as `#fff68f`.
    pub color: String,
    /// Unique slug used by recipe filters.
    pub slug: String,
}

/// Ingredient row to insert when loading the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}

/// Tag row to insert when loading the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

/// Case-insensitive name-prefix search over ingredients.
///
/// Blank input matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientSearch {
    prefix: Option<String>,
}

impl IngredientSearch {
    /// Build a search from an optional raw query value.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::IngredientSearch;
    ///
    /// assert_eq!(IngredientSearch::new(Some("  Му ")).prefix(), Some("му"));
    /// assert_eq!(IngredientSearch::new(Some("   ")).prefix(), None);
    /// ```
    pub fn new(raw: Option<&str>) -> Self {
        let prefix = raw
            .map(|value| value.trim().to_lowercase())
            .filter(|value| !value.is_empty());
        Self { prefix }
    }

    /// Lower-cased prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Whether `ingredient` satisfies the search.
    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        self.prefix
            .as_deref()
            .is_none_or(|prefix| ingredient.name.to_lowercase().starts_with(prefix))
    }
}
