//! PostgreSQL-backed cart reads for the shopping list export.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ShoppingCartRepository, ShoppingCartRepositoryError};
use crate::domain::{CartLine, RecipeId, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::pool::{DbPool, PoolError};
use super::schema::{cart_entries, ingredients, recipe_ingredients};

/// Diesel-backed implementation of [`ShoppingCartRepository`].
#[derive(Clone)]
pub struct DieselShoppingCartRepository {
    pool: DbPool,
}

impl DieselShoppingCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShoppingCartRepositoryError {
    ShoppingCartRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> ShoppingCartRepositoryError {
    match classify_diesel_error(error, "shopping cart read") {
        DieselFailure::Connection => {
            ShoppingCartRepositoryError::connection("database connection error")
        }
        DieselFailure::Query { message } => ShoppingCartRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => ShoppingCartRepositoryError::query(
            format!("unexpected constraint violation: {constraint}"),
        ),
    }
}

#[async_trait]
impl ShoppingCartRepository for DieselShoppingCartRepository {
    async fn cart_recipe_ids(
        &self,
        actor: UserId,
    ) -> Result<Vec<RecipeId>, ShoppingCartRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i64> = cart_entries::table
            .filter(cart_entries::user_id.eq(actor.get()))
            .select(cart_entries::recipe_id)
            .order_by(cart_entries::id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(RecipeId::new).collect())
    }

    async fn composition_lines(
        &self,
        recipes: &[RecipeId],
    ) -> Result<Vec<CartLine>, ShoppingCartRepositoryError> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = recipes.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, String, f64)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(ids))
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(name, measurement_unit, amount)| CartLine {
                name,
                measurement_unit,
                amount,
            })
            .collect())
    }
}
