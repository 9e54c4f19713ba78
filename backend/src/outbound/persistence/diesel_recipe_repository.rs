//! PostgreSQL-backed recipe adapter.
//!
//! Writes run in one transaction: the scalar row is inserted or updated, the
//! composition lines and tag links are deleted and re-inserted wholesale.
//! Reads hydrate recipes in three queries per batch (rows and authors,
//! composition lines, tags) regardless of page size.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Amount, CompositionLine, CookingTime, ImageRef, LineSpec, NewRecipe, Recipe, RecipeChanges,
    RecipeFilter, RecipeId, RecipeSummary, TagId, UserId,
};

use super::diesel_catalog_repository::{row_to_ingredient, row_to_tag};
use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, count_to_total, limit_offset,
};
use super::diesel_user_repository::row_to_profile;
use super::models::{
    IngredientRow, NewRecipeIngredientRow, NewRecipeRow, NewRecipeTagRow, RecipeChangeset,
    RecipeRow, TagRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    cart_entries, favourites, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};

/// Diesel-backed implementation of [`RecipeRepository`].
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    RecipeRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    match classify_diesel_error(error, "recipe persistence") {
        DieselFailure::Connection => RecipeRepositoryError::connection("database connection error"),
        DieselFailure::Query { message } => RecipeRepositoryError::query(message),
        DieselFailure::ForeignKeyViolation { constraint } => {
            RecipeRepositoryError::missing_reference(constraint)
        }
        DieselFailure::UniqueViolation { constraint } => {
            RecipeRepositoryError::query(format!("unexpected unique violation: {constraint}"))
        }
    }
}

fn minutes_to_column(cooking_time: CookingTime) -> Result<i32, RecipeRepositoryError> {
    i32::try_from(cooking_time.minutes())
        .map_err(|_| RecipeRepositoryError::query("cooking_time exceeds column range"))
}

fn column_to_minutes(value: i32) -> Result<CookingTime, RecipeRepositoryError> {
    CookingTime::new(i64::from(value))
        .map_err(|err| RecipeRepositoryError::query(format!("corrupt cooking_time: {err}")))
}

fn row_to_summary(row: RecipeRow) -> Result<RecipeSummary, RecipeRepositoryError> {
    Ok(RecipeSummary {
        id: RecipeId::new(row.id),
        cooking_time: column_to_minutes(row.cooking_time)?,
        name: row.name,
        image: ImageRef::new(row.image),
    })
}

fn line_rows(recipe_id: i64, lines: &[LineSpec]) -> Vec<NewRecipeIngredientRow> {
    lines
        .iter()
        .map(|line| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: line.ingredient.get(),
            amount: line.amount.value(),
        })
        .collect()
}

fn tag_rows(recipe_id: i64, tags: &[TagId]) -> Vec<NewRecipeTagRow> {
    tags.iter()
        .map(|tag| NewRecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
        })
        .collect()
}

/// Insert composition lines and tag links for `recipe_id`.
async fn insert_children(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    lines: &[LineSpec],
    tag_ids: &[TagId],
) -> Result<(), diesel::result::Error> {
    let lines = line_rows(recipe_id, lines);
    if !lines.is_empty() {
        diesel::insert_into(recipe_ingredients::table)
            .values(&lines)
            .execute(conn)
            .await?;
    }
    let links = tag_rows(recipe_id, tag_ids);
    if !links.is_empty() {
        diesel::insert_into(recipe_tags::table)
            .values(&links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Recipe rows matching `filter`, as a boxed query reusable for counting.
fn filtered(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author.get()));
    }
    if !filter.tags.is_empty() {
        let tagged = recipe_tags::table
            .inner_join(tags::table)
            .filter(tags::slug.eq_any(filter.tags.clone()))
            .select(recipe_tags::recipe_id);
        query = query.filter(recipes::id.eq_any(tagged));
    }
    if let Some(user) = filter.favourited_by {
        let favourited = favourites::table
            .filter(favourites::user_id.eq(user.get()))
            .select(favourites::recipe_id);
        query = query.filter(recipes::id.eq_any(favourited));
    }
    if let Some(user) = filter.in_cart_of {
        let in_cart = cart_entries::table
            .filter(cart_entries::user_id.eq(user.get()))
            .select(cart_entries::recipe_id);
        query = query.filter(recipes::id.eq_any(in_cart));
    }
    query
}

impl DieselRecipeRepository {
    /// Attach authors, composition lines and tags to `rows`, keeping order.
    async fn hydrate(
        conn: &mut AsyncPgConnection,
        rows: Vec<RecipeRow>,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let author_ids: Vec<i64> = rows.iter().filter_map(|row| row.author_id).collect();

        let authors: Vec<UserRow> = users::table
            .filter(users::id.eq_any(author_ids))
            .select(UserRow::as_select())
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        let authors: HashMap<i64, UserRow> =
            authors.into_iter().map(|row| (row.id, row)).collect();

        let lines: Vec<(i64, f64, IngredientRow)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(ids.clone()))
            .select((
                recipe_ingredients::recipe_id,
                recipe_ingredients::amount,
                IngredientRow::as_select(),
            ))
            .order_by(recipe_ingredients::id)
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        let mut lines_by_recipe: HashMap<i64, Vec<CompositionLine>> = HashMap::new();
        for (recipe_id, amount, ingredient) in lines {
            let amount = Amount::new(amount)
                .ok_or_else(|| RecipeRepositoryError::query("corrupt composition amount"))?;
            lines_by_recipe
                .entry(recipe_id)
                .or_default()
                .push(CompositionLine {
                    ingredient: row_to_ingredient(ingredient),
                    amount,
                });
        }

        let tag_links: Vec<(i64, TagRow)> = recipe_tags::table
            .inner_join(tags::table)
            .filter(recipe_tags::recipe_id.eq_any(ids))
            .select((recipe_tags::recipe_id, TagRow::as_select()))
            .order_by(tags::id)
            .load(conn)
            .await
            .map_err(map_diesel_error)?;
        let mut tags_by_recipe: HashMap<i64, Vec<_>> = HashMap::new();
        for (recipe_id, tag) in tag_links {
            tags_by_recipe
                .entry(recipe_id)
                .or_default()
                .push(row_to_tag(tag));
        }

        rows.into_iter()
            .map(|row| {
                let author = row
                    .author_id
                    .and_then(|id| authors.get(&id).cloned())
                    .map(row_to_profile);
                Ok(Recipe {
                    id: RecipeId::new(row.id),
                    author,
                    cooking_time: column_to_minutes(row.cooking_time)?,
                    name: row.name,
                    image: ImageRef::new(row.image),
                    text: row.text,
                    tags: tags_by_recipe.remove(&row.id).unwrap_or_default(),
                    ingredients: lines_by_recipe.remove(&row.id).unwrap_or_default(),
                    pub_date: row.pub_date,
                })
            })
            .collect()
    }
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError> {
        let row = NewRecipeRow {
            author_id: Some(recipe.author.get()),
            name: recipe.name.as_str(),
            image: recipe.image.as_str(),
            text: recipe.text.as_str(),
            cooking_time: minutes_to_column(recipe.cooking_time)?,
            pub_date: recipe.pub_date,
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(recipes::table)
                        .values(&row)
                        .returning(recipes::id)
                        .get_result(conn)
                        .await?;
                    insert_children(conn, id, &recipe.lines, &recipe.tags).await?;
                    Ok(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(RecipeId::new(id))
    }

    async fn replace(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<bool, RecipeRepositoryError> {
        let changeset = RecipeChangeset {
            name: changes.name.as_str(),
            image: changes.image.as_ref().map(ImageRef::as_str),
            text: changes.text.as_str(),
            cooking_time: minutes_to_column(changes.cooking_time)?,
        };
        let recipe_id = id.get();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let updated = diesel::update(recipes::table.find(recipe_id))
                    .set(&changeset)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                )
                .execute(conn)
                .await?;
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                    .execute(conn)
                    .await?;
                insert_children(conn, recipe_id, &changes.lines, &changes.tags).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipes::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut hydrated = Self::hydrate(&mut conn, vec![row]).await?;
        Ok(hydrated.pop())
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_summary).transpose()
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let (limit, offset) = limit_offset(request);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<RecipeRow> = filtered(filter)
            .select(RecipeRow::as_select())
            .order_by((recipes::pub_date.desc(), recipes::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let items = Self::hydrate(&mut conn, rows).await?;
        Ok(Page::new(items, count_to_total(total), request))
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .select(RecipeRow::as_select())
            .order_by((recipes::pub_date.desc(), recipes::id.desc()))
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::from(limit));
        }
        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_summary).collect()
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(count_to_total(count))
    }
}
