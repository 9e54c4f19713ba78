//! Shopping list export.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    ShoppingCartQuery, ShoppingCartRepository, ShoppingCartRepositoryError,
};
use crate::domain::{Error, ShoppingList, ShoppingListDocument, ShoppingListLayout, UserId};

/// Aggregates a user's cart into a plain-text shopping list.
#[derive(Clone)]
pub struct ShoppingCartService<S> {
    repo: Arc<S>,
    layout: ShoppingListLayout,
}

impl<S> ShoppingCartService<S> {
    pub fn new(repo: Arc<S>, layout: ShoppingListLayout) -> Self {
        Self { repo, layout }
    }
}

fn map_cart_error(error: ShoppingCartRepositoryError) -> Error {
    match error {
        ShoppingCartRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("shopping cart unavailable: {message}"))
        }
        ShoppingCartRepositoryError::Query { message } => {
            Error::internal(format!("shopping cart error: {message}"))
        }
    }
}

#[async_trait]
impl<S> ShoppingCartQuery for ShoppingCartService<S>
where
    S: ShoppingCartRepository,
{
    async fn export(&self, actor: UserId) -> Result<ShoppingListDocument, Error> {
        let recipes = self
            .repo
            .cart_recipe_ids(actor)
            .await
            .map_err(map_cart_error)?;
        if recipes.is_empty() {
            return Err(Error::empty_cart());
        }
        let lines = self
            .repo
            .composition_lines(&recipes)
            .await
            .map_err(map_cart_error)?;
        let list = ShoppingList::aggregate(lines);
        debug!(
            user = %actor,
            recipes = recipes.len(),
            entries = list.entries().len(),
            "shopping list aggregated"
        );
        Ok(ShoppingListDocument::new(list.render(self.layout)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockShoppingCartRepository;
    use crate::domain::{CartLine, ErrorCode, RecipeId};
    use rstest::rstest;

    fn line(name: &str, unit: &str, amount: f64) -> CartLine {
        CartLine {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn empty_cart_fails_without_loading_lines() {
        let mut repo = MockShoppingCartRepository::new();
        repo.expect_cart_recipe_ids()
            .times(1)
            .return_once(|_| Ok(Vec::new()));
        repo.expect_composition_lines().times(0);
        let service = ShoppingCartService::new(Arc::new(repo), ShoppingListLayout::default());

        let err = service
            .export(UserId::new(1))
            .await
            .expect_err("empty cart");
        assert_eq!(err.code(), ErrorCode::EmptyCart);
    }

    #[rstest]
    #[case(ShoppingListLayout::Concatenated, "Список продуктов:\nEgg 2 pcsFlour 300 gSugar 50 g")]
    #[case(
        ShoppingListLayout::LinePerEntry,
        "Список продуктов:\nEgg 2 pcs\nFlour 300 g\nSugar 50 g\n"
    )]
    #[tokio::test]
    async fn two_recipes_aggregate_into_sorted_totals(
        #[case] layout: ShoppingListLayout,
        #[case] expected: &str,
    ) {
        let mut repo = MockShoppingCartRepository::new();
        repo.expect_cart_recipe_ids()
            .times(1)
            .return_once(|_| Ok(vec![RecipeId::new(1), RecipeId::new(2)]));
        repo.expect_composition_lines()
            .withf(|recipes| recipes.len() == 2)
            .times(1)
            .return_once(|_| {
                Ok(vec![
                    line("Flour", "g", 200.0),
                    line("Sugar", "g", 50.0),
                    line("Flour", "g", 100.0),
                    line("Egg", "pcs", 2.0),
                ])
            });
        let service = ShoppingCartService::new(Arc::new(repo), layout);

        let document = service.export(UserId::new(1)).await.expect("export");
        assert_eq!(document.filename, "listbuy.txt");
        assert_eq!(document.body, expected);
    }
}
