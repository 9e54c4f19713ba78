//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts provisioned by the identity provider.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Ingredient catalog, unique by `(name, measurement_unit)`.
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Recipe tags with unique slugs.
    tags (id) {
        id -> Int8,
        name -> Varchar,
        color -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        /// Nullable for legacy rows; new recipes always carry an author.
        author_id -> Nullable<Int8>,
        name -> Varchar,
        /// Public URL of the stored image.
        image -> Text,
        text -> Text,
        cooking_time -> Int4,
        pub_date -> Timestamptz,
    }
}

diesel::table! {
    /// Composition lines, unique by `(recipe_id, ingredient_id)`.
    recipe_ingredients (id) {
        id -> Int8,
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Float8,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    favourites (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    cart_entries (id) {
        id -> Int8,
        user_id -> Int8,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// `user_id` follows `author_id`.
    follows (id) {
        id -> Int8,
        user_id -> Int8,
        author_id -> Int8,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(favourites -> recipes (recipe_id));
diesel::joinable!(cart_entries -> recipes (recipe_id));
diesel::joinable!(follows -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(
    cart_entries,
    favourites,
    follows,
    ingredients,
    recipe_ingredients,
    recipe_tags,
    recipes,
    tags,
    users,
);
