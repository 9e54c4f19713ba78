//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_PAGE_SIZE;

use crate::domain::ports::{
    CatalogQuery, FixtureCatalogQuery, FixtureLedgerCommand, FixtureRecipeCommand,
    FixtureRecipeQuery, FixtureShoppingCartQuery, FixtureSubscriptionsQuery, FixtureUsersQuery,
    LedgerCommand, RecipeCommand, RecipeQuery, ShoppingCartQuery, SubscriptionsQuery, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub catalog: Arc<dyn CatalogQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub ledger: Arc<dyn LedgerCommand>,
    pub shopping_cart: Arc<dyn ShoppingCartQuery>,
    pub users: Arc<dyn UsersQuery>,
    pub subscriptions: Arc<dyn SubscriptionsQuery>,
}

impl Default for HttpStatePorts {
    fn default() -> Self {
        Self {
            catalog: Arc::new(FixtureCatalogQuery),
            recipes: Arc::new(FixtureRecipeCommand),
            recipes_query: Arc::new(FixtureRecipeQuery),
            ledger: Arc::new(FixtureLedgerCommand),
            shopping_cart: Arc::new(FixtureShoppingCartQuery),
            users: Arc::new(FixtureUsersQuery),
            subscriptions: Arc::new(FixtureSubscriptionsQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn CatalogQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub ledger: Arc<dyn LedgerCommand>,
    pub shopping_cart: Arc<dyn ShoppingCartQuery>,
    pub users: Arc<dyn UsersQuery>,
    pub subscriptions: Arc<dyn SubscriptionsQuery>,
    /// Page size used when a request omits `limit`.
    pub default_page_size: u32,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, DEFAULT_PAGE_SIZE)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::default(), 10);
    /// assert_eq!(state.default_page_size, 10);
    /// ```
    pub fn new(ports: HttpStatePorts, default_page_size: u32) -> Self {
        let HttpStatePorts {
            catalog,
            recipes,
            recipes_query,
            ledger,
            shopping_cart,
            users,
            subscriptions,
        } = ports;
        Self {
            catalog,
            recipes,
            recipes_query,
            ledger,
            shopping_cart,
            users,
            subscriptions,
            default_page_size,
        }
    }
}
