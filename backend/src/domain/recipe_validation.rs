//! Composition validation for recipe writes.
//!
//! Checks run in a fixed order so clients always see the same error for the
//! same input:
//!
//! 1. cooking time is at least one minute;
//! 2. every amount is positive;
//! 3. scalar text fields are present;
//! 4. no ingredient appears twice once ids are resolved to catalog rows;
//! 5. every ingredient and tag id exists in the catalog.
//!
//! Steps 1 to 3 are pure ([`check_fields`]); steps 4 and 5 need the catalog
//! rows the draft refers to ([`check_composition`]).

use std::collections::{HashMap, HashSet};

use serde_json::json;

use super::catalog::{Ingredient, Tag};
use super::error::Error;
use super::ids::{IngredientId, TagId};
use super::recipe::{Amount, CookingTime, LineSpec, RECIPE_NAME_MAX, RecipeDraft};

/// Reasons a recipe write is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("cooking_time must be > 0")]
    CookingTime { value: i64 },
    #[error("cooking_time must be at most {max}", max = CookingTime::MAX_MINUTES)]
    CookingTimeTooLong { value: i64 },
    #[error("amount must be > 0")]
    Amount {
        index: usize,
        ingredient: IngredientId,
        value: f64,
    },
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {RECIPE_NAME_MAX} characters")]
    NameTooLong,
    #[error("text must not be empty")]
    EmptyText,
    #[error("image is required")]
    MissingImage,
    #[error("duplicate ingredient")]
    DuplicateIngredients { names: Vec<String> },
    #[error("ingredient not found")]
    UnknownIngredients { ids: Vec<IngredientId> },
    #[error("tag not found")]
    UnknownTags { ids: Vec<TagId> },
}

impl From<RecipeValidationError> for Error {
    fn from(value: RecipeValidationError) -> Self {
        let message = value.to_string();
        match value {
            RecipeValidationError::CookingTime { value }
            | RecipeValidationError::CookingTimeTooLong { value } => Error::invalid_request(message)
                .with_details(json!({ "field": "cooking_time", "value": value })),
            RecipeValidationError::Amount {
                index,
                ingredient,
                value,
            } => Error::invalid_request(message).with_details(json!({
                "field": "ingredients",
                "index": index,
                "id": ingredient,
                "amount": value,
            })),
            RecipeValidationError::EmptyName | RecipeValidationError::NameTooLong => {
                Error::invalid_request(message).with_details(json!({ "field": "name" }))
            }
            RecipeValidationError::EmptyText => {
                Error::invalid_request(message).with_details(json!({ "field": "text" }))
            }
            RecipeValidationError::MissingImage => {
                Error::invalid_request(message).with_details(json!({ "field": "image" }))
            }
            RecipeValidationError::DuplicateIngredients { names } => Error::invalid_request(
                message,
            )
            .with_details(json!({ "field": "ingredients", "names": names })),
            RecipeValidationError::UnknownIngredients { ids } => {
                Error::not_found(message).with_details(json!({ "field": "ingredients", "ids": ids }))
            }
            RecipeValidationError::UnknownTags { ids } => {
                Error::not_found(message).with_details(json!({ "field": "tags", "ids": ids }))
            }
        }
    }
}

/// Draft fields that passed the pure checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedFields {
    pub name: String,
    pub text: String,
    pub cooking_time: CookingTime,
    pub lines: Vec<LineSpec>,
    /// Requested tags without repeats, in first-seen order.
    pub tags: Vec<TagId>,
}

/// Run the checks that need no catalog access.
///
/// # Examples
/// ```
/// use foodgram::domain::{CompositionInput, IngredientId, RecipeDraft, check_fields};
///
/// let draft = RecipeDraft {
///     name: "Soup".into(),
///     text: "Boil.".into(),
///     cooking_time: 0,
///     ingredients: vec![CompositionInput { ingredient: IngredientId::new(1), amount: 0.0 }],
///     tags: vec![],
///     image: None,
/// };
/// let err = check_fields(&draft).expect_err("cooking time is checked first");
/// assert_eq!(err.to_string(), "cooking_time must be > 0");
/// ```
pub fn check_fields(draft: &RecipeDraft) -> Result<CheckedFields, RecipeValidationError> {
    let cooking_time = CookingTime::new(draft.cooking_time)?;

    let lines = draft
        .ingredients
        .iter()
        .enumerate()
        .map(|(index, input)| {
            Amount::new(input.amount)
                .map(|amount| LineSpec {
                    ingredient: input.ingredient,
                    amount,
                })
                .ok_or(RecipeValidationError::Amount {
                    index,
                    ingredient: input.ingredient,
                    value: input.amount,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name = draft.name.trim();
    if name.is_empty() {
        return Err(RecipeValidationError::EmptyName);
    }
    if name.chars().count() > RECIPE_NAME_MAX {
        return Err(RecipeValidationError::NameTooLong);
    }
    let text = draft.text.trim();
    if text.is_empty() {
        return Err(RecipeValidationError::EmptyText);
    }

    let mut seen = HashSet::new();
    let tags = draft
        .tags
        .iter()
        .copied()
        .filter(|tag| seen.insert(*tag))
        .collect();

    Ok(CheckedFields {
        name: name.to_owned(),
        text: text.to_owned(),
        cooking_time,
        lines,
        tags,
    })
}

/// Check the composition against the catalog rows it references.
///
/// `catalog` holds the ingredients that resolved; ids missing from it are
/// unknown. Duplicates are detected by resolved ingredient name, so two ids
/// naming the same product are rejected just like a repeated id.
pub fn check_composition(
    lines: &[LineSpec],
    catalog: &[Ingredient],
    tags: &[TagId],
    known_tags: &[Tag],
) -> Result<(), RecipeValidationError> {
    let by_id: HashMap<IngredientId, &Ingredient> =
        catalog.iter().map(|ingredient| (ingredient.id, ingredient)).collect();

    let mut names_seen = HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    let mut unknown: Vec<IngredientId> = Vec::new();
    for line in lines {
        match by_id.get(&line.ingredient) {
            Some(ingredient) => {
                let name = ingredient.name.as_str();
                if !names_seen.insert(name) && !duplicates.iter().any(|seen| seen == name) {
                    duplicates.push(name.to_owned());
                }
            }
            None => {
                if !unknown.contains(&line.ingredient) {
                    unknown.push(line.ingredient);
                }
            }
        }
    }

    if !duplicates.is_empty() {
        return Err(RecipeValidationError::DuplicateIngredients { names: duplicates });
    }
    if !unknown.is_empty() {
        return Err(RecipeValidationError::UnknownIngredients { ids: unknown });
    }

    let known: HashSet<TagId> = known_tags.iter().map(|tag| tag.id).collect();
    let missing_tags: Vec<TagId> = tags.iter().copied().filter(|id| !known.contains(id)).collect();
    if !missing_tags.is_empty() {
        return Err(RecipeValidationError::UnknownTags { ids: missing_tags });
    }
    Ok(())
}
