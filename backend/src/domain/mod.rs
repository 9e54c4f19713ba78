//! Domain primitives, aggregates, ports and services.
//!
//! Types here are transport agnostic. Inbound adapters translate HTTP into
//! these types and outbound adapters implement the traits in [`ports`].
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: the error payload every port returns.
//! - Catalog, recipe, ledger and shopping list types.
//! - Services implementing the driving ports.

pub mod catalog;
mod catalog_service;
pub mod error;
pub mod ids;
pub mod ledger;
mod ledger_service;
pub mod ports;
pub mod recipe;
mod recipe_service;
pub mod recipe_validation;
pub mod shopping_list;
mod shopping_cart_service;
pub mod trace_id;
pub mod user;
mod users_service;

pub use self::catalog::{Ingredient, IngredientSearch, NewIngredient, NewTag, Tag};
pub use self::catalog_service::{CatalogIngestionService, CatalogLoadSummary, CatalogService};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{IdParseError, IngredientId, RecipeId, TagId, UserId};
pub use self::ledger::{Relation, RelationKind, RelationTarget};
pub use self::ledger_service::LedgerService;
pub use self::recipe::{
    Amount, CompositionInput, CompositionLine, CookingTime, ImagePayload, ImageRef, LineSpec,
    NewRecipe, RECIPE_NAME_MAX, Recipe, RecipeChanges, RecipeDetail, RecipeDraft, RecipeFilter,
    RecipeListQuery, RecipeSummary,
};
pub use self::recipe_service::{RecipeService, RecipeServicePorts};
pub use self::recipe_validation::{
    CheckedFields, RecipeValidationError, check_composition, check_fields,
};
pub use self::shopping_cart_service::ShoppingCartService;
pub use self::shopping_list::{
    CartLine, SHOPPING_LIST_FILENAME, SHOPPING_LIST_HEADER, ShoppingList, ShoppingListDocument,
    ShoppingListEntry, ShoppingListLayout, format_amount,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{AuthorView, UserProfile, Viewer};
pub use self::users_service::UsersService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use foodgram::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
