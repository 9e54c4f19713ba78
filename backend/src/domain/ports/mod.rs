//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ImageStore`]) describe what the domain
//! needs from storage and return typed errors declared with
//! `define_port_error!`. Driving ports (`*Query`, `*Command`) are what
//! inbound adapters call and return domain [`Error`](crate::domain::Error)s.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_ingestion_repository;
mod catalog_query;
mod catalog_repository;
mod image_store;
mod ledger_command;
mod ledger_repository;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod shopping_cart_query;
mod shopping_cart_repository;
mod subscriptions_query;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use catalog_ingestion_repository::MockCatalogIngestionRepository;
pub use catalog_ingestion_repository::{
    CatalogIngestionRepository, CatalogIngestionRepositoryError, FixtureCatalogIngestionRepository,
};
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::{CatalogQuery, FixtureCatalogQuery};
#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{CatalogRepository, CatalogRepositoryError, FixtureCatalogRepository};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{FixtureImageStore, ImageStore, ImageStoreError};
#[cfg(test)]
pub use ledger_command::MockLedgerCommand;
pub use ledger_command::{FixtureLedgerCommand, LedgerCommand, LedgerReceipt, TargetProjection};
#[cfg(test)]
pub use ledger_repository::MockLedgerRepository;
pub use ledger_repository::{FixtureLedgerRepository, LedgerRepository, LedgerRepositoryError};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::{FixtureRecipeCommand, RecipeCommand};
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::{FixtureRecipeQuery, RecipeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{FixtureRecipeRepository, RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use shopping_cart_query::MockShoppingCartQuery;
pub use shopping_cart_query::{FixtureShoppingCartQuery, ShoppingCartQuery};
#[cfg(test)]
pub use shopping_cart_repository::MockShoppingCartRepository;
pub use shopping_cart_repository::{
    FixtureShoppingCartRepository, ShoppingCartRepository, ShoppingCartRepositoryError,
};
#[cfg(test)]
pub use subscriptions_query::MockSubscriptionsQuery;
pub use subscriptions_query::{FixtureSubscriptionsQuery, Subscription, SubscriptionsQuery};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{FixtureUsersQuery, UsersQuery};
