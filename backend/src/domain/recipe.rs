//! Recipe aggregate: scalar fields, composition lines and tag set.
//!
//! A recipe owns its composition. Writes replace the whole composition and
//! tag set; they are never merged with what was stored before.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{Ingredient, Tag};
use super::ids::{IngredientId, RecipeId, TagId, UserId};
use super::recipe_validation::RecipeValidationError;
use super::user::{AuthorView, UserProfile, Viewer};

/// Maximum characters in a recipe name.
pub const RECIPE_NAME_MAX: usize = 200;

/// Cooking time in whole minutes, from one to [`CookingTime::MAX_MINUTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct CookingTime(u32);

impl CookingTime {
    /// Largest storable value; the column is a 32-bit signed integer.
    pub const MAX_MINUTES: u32 = i32::MAX.unsigned_abs();

    /// Validate a raw minute count.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::CookingTime;
    ///
    /// assert!(CookingTime::new(0).is_err());
    /// assert_eq!(CookingTime::new(1).map(CookingTime::minutes), Ok(1));
    /// ```
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        if minutes > i64::from(Self::MAX_MINUTES) {
            return Err(RecipeValidationError::CookingTimeTooLong { value: minutes });
        }
        u32::try_from(minutes)
            .ok()
            .filter(|value| *value >= 1)
            .map(Self)
            .ok_or(RecipeValidationError::CookingTime { value: minutes })
    }

    /// Minutes as an unsigned integer.
    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for CookingTime {
    type Error = RecipeValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CookingTime> for i64 {
    fn from(value: CookingTime) -> Self {
        i64::from(value.0)
    }
}

/// A strictly positive, finite ingredient quantity.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    /// Returns `None` unless `value` is finite and greater than zero.
    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(Self(value))
    }

    /// The quantity.
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Reference to a stored recipe image, typically a public URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// An uploaded image as received from the client (a base64 data URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload(String);

impl ImagePayload {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// One submitted `(ingredient, amount)` pair before validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionInput {
    pub ingredient: IngredientId,
    pub amount: f64,
}

/// Create/replace input for a recipe, as submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    pub cooking_time: i64,
    pub ingredients: Vec<CompositionInput>,
    pub tags: Vec<TagId>,
    /// Required on create; on replace `None` keeps the stored image.
    pub image: Option<ImagePayload>,
}

/// A validated composition line referencing the catalog by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSpec {
    pub ingredient: IngredientId,
    pub amount: Amount,
}

/// Scalar fields and composition persisted on create.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub author: UserId,
    pub name: String,
    pub text: String,
    pub cooking_time: CookingTime,
    pub image: ImageRef,
    pub lines: Vec<LineSpec>,
    pub tags: Vec<TagId>,
    pub pub_date: DateTime<Utc>,
}

/// Replacement written over an existing recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeChanges {
    pub name: String,
    pub text: String,
    pub cooking_time: CookingTime,
    /// `None` keeps the stored image.
    pub image: Option<ImageRef>,
    pub lines: Vec<LineSpec>,
    pub tags: Vec<TagId>,
}

/// A composition line joined with its catalog ingredient.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionLine {
    pub ingredient: Ingredient,
    pub amount: Amount,
}

/// A stored recipe with its composition and tags resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    /// `None` for legacy rows whose author was removed.
    pub author: Option<UserProfile>,
    pub name: String,
    pub image: ImageRef,
    pub text: String,
    pub cooking_time: CookingTime,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<CompositionLine>,
    pub pub_date: DateTime<Utc>,
}

impl Recipe {
    /// Id of the author, if the recipe still has one.
    pub fn author_id(&self) -> Option<UserId> {
        self.author.as_ref().map(|author| author.id)
    }

    /// Lightweight projection used by ledger responses and previews.
    pub fn summary(&self) -> RecipeSummary {
        RecipeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            cooking_time: self.cooking_time,
        }
    }
}

/// `{id, name, image, cooking_time}` projection of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: ImageRef,
    pub cooking_time: CookingTime,
}

/// A recipe enriched with flags relative to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetail {
    pub recipe: Recipe,
    pub author: Option<AuthorView>,
    pub is_favourited: bool,
    pub is_in_cart: bool,
}

impl RecipeDetail {
    /// Detail with every viewer flag unset.
    pub fn anonymous(recipe: Recipe) -> Self {
        let author = recipe.author.clone().map(|profile| AuthorView {
            profile,
            is_subscribed: false,
        });
        Self {
            recipe,
            author,
            is_favourited: false,
            is_in_cart: false,
        }
    }
}

/// Listing filters as requested by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    pub author: Option<UserId>,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Listing filters resolved against the viewer, ready for the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub tags: Vec<String>,
    pub favourited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

impl RecipeFilter {
    /// Resolve viewer-relative flags. Anonymous viewers have no favourites or
    /// cart, so those flags are dropped for them.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{RecipeFilter, RecipeListQuery, UserId, Viewer};
    ///
    /// let query = RecipeListQuery { is_favorited: true, ..RecipeListQuery::default() };
    /// assert_eq!(RecipeFilter::resolve(&query, Viewer::Anonymous).favourited_by, None);
    ///
    /// let me = UserId::new(5);
    /// let filter = RecipeFilter::resolve(&query, Viewer::Authenticated(me));
    /// assert_eq!(filter.favourited_by, Some(me));
    /// ```
    pub fn resolve(query: &RecipeListQuery, viewer: Viewer) -> Self {
        let actor = viewer.user_id();
        Self {
            author: query.author,
            tags: query.tags.clone(),
            favourited_by: actor.filter(|_| query.is_favorited),
            in_cart_of: actor.filter(|_| query.is_in_shopping_cart),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1, false)]
    #[case(0, false)]
    #[case(1, true)]
    #[case(600, true)]
    #[case(i64::from(i32::MAX), true)]
    #[case(i64::from(i32::MAX) + 1, false)]
    #[case(3_000_000_000, false)]
    #[case(i64::from(u32::MAX) + 1, false)]
    fn cooking_time_boundary_is_one_minute(#[case] minutes: i64, #[case] ok: bool) {
        assert_eq!(CookingTime::new(minutes).is_ok(), ok);
    }

    #[rstest]
    fn oversized_cooking_time_is_a_validation_error() {
        assert_eq!(
            CookingTime::new(3_000_000_000),
            Err(RecipeValidationError::CookingTimeTooLong {
                value: 3_000_000_000
            })
        );
    }

    #[rstest]
    #[case(0.5, true)]
    #[case(1.0, true)]
    #[case(0.0, false)]
    #[case(-2.0, false)]
    #[case(f64::NAN, false)]
    #[case(f64::INFINITY, false)]
    fn amount_must_be_positive_and_finite(#[case] value: f64, #[case] ok: bool) {
        assert_eq!(Amount::new(value).is_some(), ok);
    }

    #[rstest]
    fn cooking_time_deserialises_with_validation() {
        let ok: CookingTime = serde_json::from_str("15").expect("valid minutes");
        assert_eq!(ok.minutes(), 15);
        assert!(serde_json::from_str::<CookingTime>("0").is_err());
    }
}
