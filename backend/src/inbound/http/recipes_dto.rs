//! Request and response bodies for recipe endpoints.
//!
//! Reads render as [`RecipeView`]: the full `Detail` shape for recipe reads
//! and the four-field `Summary` shape for ledger toggles and subscription
//! previews. Writes accept a single [`RecipeWriteRequest`] for create and
//! replace.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthorView, CompositionInput, CompositionLine, ImagePayload, Ingredient, IngredientId,
    RecipeDetail, RecipeDraft, RecipeSummary, Tag, TagId, UserProfile,
};

/// One `{id, amount}` composition line in a write request.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct IngredientAmountRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 200)]
    pub amount: f64,
}

/// Body of `POST /api/recipes/` and `PATCH /api/recipes/{id}/`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RecipeWriteRequest {
    pub ingredients: Vec<IngredientAmountRequest>,
    pub tags: Vec<i64>,
    /// `data:image/<ext>;base64,...`; required on create.
    #[serde(default)]
    pub image: Option<String>,
    #[schema(example = "Борщ")]
    pub name: String,
    pub text: String,
    #[schema(example = 90)]
    pub cooking_time: i64,
}

impl From<RecipeWriteRequest> for RecipeDraft {
    fn from(value: RecipeWriteRequest) -> Self {
        Self {
            name: value.name,
            text: value.text,
            cooking_time: value.cooking_time,
            ingredients: value
                .ingredients
                .into_iter()
                .map(|line| CompositionInput {
                    ingredient: IngredientId::new(line.id),
                    amount: line.amount,
                })
                .collect(),
            tags: value.tags.into_iter().map(TagId::new).collect(),
            image: value
                .image
                .filter(|raw| !raw.trim().is_empty())
                .map(ImagePayload::new),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TagBody {
    pub id: i64,
    #[schema(example = "суп")]
    pub name: String,
    #[schema(example = "#fff68f")]
    pub color: String,
    #[schema(example = "soup")]
    pub slug: String,
}

impl From<Tag> for TagBody {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IngredientBody {
    pub id: i64,
    #[schema(example = "мука")]
    pub name: String,
    #[schema(example = "г")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientBody {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// An ingredient with the amount a recipe uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientBody {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: f64,
}

impl From<CompositionLine> for RecipeIngredientBody {
    fn from(line: CompositionLine) -> Self {
        Self {
            id: line.ingredient.id.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount.value(),
        }
    }
}

/// A user profile with the viewer-relative subscription flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBody {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_subscribed: bool,
}

impl UserBody {
    pub fn from_profile(profile: UserProfile, is_subscribed: bool) -> Self {
        Self {
            email: profile.email,
            id: profile.id.get(),
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            is_subscribed,
        }
    }
}

impl From<AuthorView> for UserBody {
    fn from(view: AuthorView) -> Self {
        Self::from_profile(view.profile, view.is_subscribed)
    }
}

/// `{id, name, image, cooking_time}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummaryBody {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

impl From<RecipeSummary> for RecipeSummaryBody {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id.get(),
            name: summary.name,
            image: summary.image.as_str().to_owned(),
            cooking_time: summary.cooking_time.minutes(),
        }
    }
}

/// A recipe as seen by the requester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeDetailBody {
    pub id: i64,
    pub tags: Vec<TagBody>,
    /// `null` for legacy recipes without an author.
    pub author: Option<UserBody>,
    pub ingredients: Vec<RecipeIngredientBody>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: u32,
}

impl From<RecipeDetail> for RecipeDetailBody {
    fn from(detail: RecipeDetail) -> Self {
        let RecipeDetail {
            recipe,
            author,
            is_favourited,
            is_in_cart,
        } = detail;
        Self {
            id: recipe.id.get(),
            tags: recipe.tags.into_iter().map(TagBody::from).collect(),
            author: author.map(UserBody::from),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientBody::from)
                .collect(),
            is_favorited: is_favourited,
            is_in_shopping_cart: is_in_cart,
            name: recipe.name,
            image: recipe.image.as_str().to_owned(),
            text: recipe.text,
            cooking_time: recipe.cooking_time.minutes(),
        }
    }
}

/// Response variants for recipe-shaped bodies.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RecipeView {
    Summary(RecipeSummaryBody),
    Detail(Box<RecipeDetailBody>),
}

impl RecipeView {
    pub fn summary(summary: RecipeSummary) -> Self {
        Self::Summary(summary.into())
    }

    pub fn detail(detail: RecipeDetail) -> Self {
        Self::Detail(Box::new(detail.into()))
    }
}
