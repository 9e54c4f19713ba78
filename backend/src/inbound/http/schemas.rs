//! OpenAPI schema definitions for paginated responses.
//!
//! [`pagination::PageEnvelope`] stays framework-agnostic and does not derive
//! `ToSchema`. The wrappers here mirror its structure for each concrete item
//! type so the generated document describes the `{count, next, previous,
//! results}` envelope precisely.

use utoipa::ToSchema;

use crate::inbound::http::recipes_dto::{RecipeDetailBody, UserBody};
use crate::inbound::http::users::SubscriptionBody;

/// Page of recipes as returned by `GET /api/recipes/`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipePageSchema {
    /// Total recipes matching the filters.
    #[schema(example = 123)]
    count: u64,
    /// Link to the following page.
    #[schema(example = "http://foodgram.example.org/api/recipes/?page=4")]
    next: Option<String>,
    /// Link to the preceding page.
    #[schema(example = "http://foodgram.example.org/api/recipes/?page=2")]
    previous: Option<String>,
    results: Vec<RecipeDetailBody>,
}

/// Page of user profiles as returned by `GET /api/users/`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageSchema {
    #[schema(example = 42)]
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<UserBody>,
}

/// Page of followed authors as returned by `GET /api/users/subscriptions/`.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubscriptionPageSchema {
    #[schema(example = 3)]
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<SubscriptionBody>,
}
