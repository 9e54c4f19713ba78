//! Driving port for the shopping list export.

use async_trait::async_trait;

use crate::domain::{Error, ShoppingListDocument, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingCartQuery: Send + Sync {
    /// Aggregate `actor`'s cart into a downloadable list.
    ///
    /// # Errors
    ///
    /// `EmptyCart` when the cart holds no recipes.
    async fn export(&self, actor: UserId) -> Result<ShoppingListDocument, Error>;
}

/// Fixture whose carts are always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureShoppingCartQuery;

#[async_trait]
impl ShoppingCartQuery for FixtureShoppingCartQuery {
    async fn export(&self, _actor: UserId) -> Result<ShoppingListDocument, Error> {
        Err(Error::empty_cart())
    }
}
