//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{
    cart_entries, favourites, follows, ingredients, recipe_ingredients, recipe_tags, recipes,
    tags, users,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub slug: &'a str,
}

// ---------------------------------------------------------------------------
// Recipe aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub author_id: Option<i64>,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub author_id: Option<i64>,
    pub name: &'a str,
    pub image: &'a str,
    pub text: &'a str,
    pub cooking_time: i32,
    pub pub_date: DateTime<Utc>,
}

/// Scalar update; a `None` image leaves the stored column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeChangeset<'a> {
    pub name: &'a str,
    pub image: Option<&'a str>,
    pub text: &'a str,
    pub cooking_time: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewRecipeIngredientRow {
    pub recipe_id: i64,
    pub ingredient_id: i64,
    pub amount: f64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct NewRecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}

// ---------------------------------------------------------------------------
// Relation ledgers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = favourites)]
pub(crate) struct NewFavouriteRow {
    pub user_id: i64,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = cart_entries)]
pub(crate) struct NewCartEntryRow {
    pub user_id: i64,
    pub recipe_id: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: i64,
    pub author_id: i64,
}
