//! Builders wiring Diesel and filesystem adapters into domain services.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use foodgram::domain::{
    CatalogService, LedgerService, RecipeService, RecipeServicePorts, ShoppingCartService,
    UsersService,
};
use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
use foodgram::outbound::media::FsImageStore;
use foodgram::outbound::persistence::{
    DieselCatalogRepository, DieselLedgerRepository, DieselRecipeRepository,
    DieselShoppingCartRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Build the handler state from the configured pool and media store.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let pool = &config.db_pool;
    let recipes_repo = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let catalog_repo = Arc::new(DieselCatalogRepository::new(pool.clone()));
    let ledger_repo = Arc::new(DieselLedgerRepository::new(pool.clone()));
    let users_repo = Arc::new(DieselUserRepository::new(pool.clone()));
    let cart_repo = Arc::new(DieselShoppingCartRepository::new(pool.clone()));

    let recipes = Arc::new(RecipeService::new(RecipeServicePorts {
        recipes: recipes_repo.clone(),
        catalog: catalog_repo.clone(),
        ledger: ledger_repo.clone(),
        images: Arc::new(FsImageStore::new(config.media.clone())),
        clock: Arc::new(DefaultClock),
    }));
    let users = Arc::new(UsersService::new(
        users_repo.clone(),
        ledger_repo.clone(),
        recipes_repo.clone(),
    ));

    let ports = HttpStatePorts {
        catalog: Arc::new(CatalogService::new(catalog_repo)),
        recipes: recipes.clone(),
        recipes_query: recipes,
        ledger: Arc::new(LedgerService::new(ledger_repo, recipes_repo, users_repo)),
        shopping_cart: Arc::new(ShoppingCartService::new(
            cart_repo,
            config.shopping_list_layout,
        )),
        users: users.clone(),
        subscriptions: users,
    };
    web::Data::new(HttpState::new(ports, config.page_size))
}
