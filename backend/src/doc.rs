//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the response bodies they use,
//! and the session cookie security scheme. The document backs Swagger UI in
//! debug builds and the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::recipes_dto::{
    IngredientAmountRequest, IngredientBody, RecipeDetailBody, RecipeIngredientBody,
    RecipeSummaryBody, RecipeView, RecipeWriteRequest, TagBody, UserBody,
};
use crate::inbound::http::schemas::{RecipePageSchema, SubscriptionPageSchema, UserPageSchema};
use crate::inbound::http::users::SubscriptionBody;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the identity provider; carries the user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram API",
        description = "Recipes, favourites, shopping carts and author subscriptions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::catalog::list_tags,
        crate::inbound::http::catalog::get_tag,
        crate::inbound::http::catalog::list_ingredients,
        crate::inbound::http::catalog::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::download_shopping_cart,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::add_favorite,
        crate::inbound::http::recipes::remove_favorite,
        crate::inbound::http::recipes::add_to_shopping_cart,
        crate::inbound::http::recipes::remove_from_shopping_cart,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_subscriptions,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::subscribe,
        crate::inbound::http::users::unsubscribe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        TagBody,
        IngredientBody,
        RecipeIngredientBody,
        UserBody,
        RecipeSummaryBody,
        RecipeDetailBody,
        RecipeView,
        RecipeWriteRequest,
        IngredientAmountRequest,
        SubscriptionBody,
        RecipePageSchema,
        UserPageSchema,
        SubscriptionPageSchema
    )),
    tags(
        (name = "catalog", description = "Tags and ingredients"),
        (name = "recipes", description = "Recipes, favourites and the shopping cart"),
        (name = "users", description = "Profiles and subscriptions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
