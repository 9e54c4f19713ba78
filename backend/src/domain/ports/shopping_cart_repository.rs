//! Port abstraction for reading a user's shopping cart.

use async_trait::async_trait;

use crate::domain::{CartLine, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading cart contents.
    pub enum ShoppingCartRepositoryError {
        /// Repository connection could not be established.
        Connection => "shopping cart connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query => "shopping cart query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingCartRepository: Send + Sync {
    /// Recipes in `actor`'s cart.
    async fn cart_recipe_ids(
        &self,
        actor: UserId,
    ) -> Result<Vec<RecipeId>, ShoppingCartRepositoryError>;

    /// Composition lines of `recipes` joined with ingredient name and unit.
    async fn composition_lines(
        &self,
        recipes: &[RecipeId],
    ) -> Result<Vec<CartLine>, ShoppingCartRepositoryError>;
}

/// Fixture whose carts are always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShoppingCartRepository;

#[async_trait]
impl ShoppingCartRepository for FixtureShoppingCartRepository {
    async fn cart_recipe_ids(
        &self,
        _actor: UserId,
    ) -> Result<Vec<RecipeId>, ShoppingCartRepositoryError> {
        Ok(Vec::new())
    }

    async fn composition_lines(
        &self,
        _recipes: &[RecipeId],
    ) -> Result<Vec<CartLine>, ShoppingCartRepositoryError> {
        Ok(Vec::new())
    }
}
