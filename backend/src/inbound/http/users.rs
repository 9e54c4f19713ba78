//! User profile and subscription endpoints.
//!
//! ```text
//! GET    /api/users/?page=1&limit=6
//! GET    /api/users/me/
//! GET    /api/users/subscriptions/?recipes_limit=3
//! GET    /api/users/{id}/
//! POST   /api/users/{id}/subscribe/?recipes_limit=3
//! DELETE /api/users/{id}/subscribe/
//! ```
//!
//! Profiles are owned by the identity provider; this service never writes
//! them.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::ports::Subscription;
use crate::domain::{Error, Relation, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::envelope;
use crate::inbound::http::recipes_dto::{RecipeSummaryBody, UserBody};
use crate::inbound::http::schemas::{SubscriptionPageSchema, UserPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, QueryParams, path_id};

const RECIPES_LIMIT: FieldName = FieldName::new("recipes_limit");

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubscriptionBody {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_subscribed: bool,
    /// Newest first, truncated by `recipes_limit`.
    pub recipes: Vec<RecipeSummaryBody>,
    /// Total recipes by the author, regardless of `recipes_limit`.
    pub recipes_count: u64,
}

impl From<Subscription> for SubscriptionBody {
    fn from(value: Subscription) -> Self {
        let Subscription {
            author,
            is_subscribed,
            recipes,
            recipes_count,
        } = value;
        Self {
            email: author.email,
            id: author.id.get(),
            username: author.username,
            first_name: author.first_name,
            last_name: author.last_name,
            is_subscribed,
            recipes: recipes.into_iter().map(RecipeSummaryBody::from).collect(),
            recipes_count,
        }
    }
}

fn user_id(raw: &str) -> Result<UserId, Error> {
    path_id(raw, "user")
}

/// List user profiles.
#[utoipa::path(
    get,
    path = "/api/users/",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Users ordered by id", body = UserPageSchema),
        (status = 400, description = "Invalid window", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users/")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::parse(req.query_string());
    let request = params.page_request(state.default_page_size)?;
    let page = state.users.list_users(session.viewer(), request).await?;
    Ok(HttpResponse::Ok().json(envelope(page.map(UserBody::from), &req)))
}

/// The session user's own profile.
#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Profile", body = UserBody),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "getCurrentUser",
    security(("SessionCookie" = []))
)]
#[get("/users/me/")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserBody>> {
    let actor = session.require_user_id()?;
    let view = state.users.me(actor).await?;
    Ok(web::Json(view.into()))
}

/// Authors the session user follows.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    params(
        ("recipes_limit" = Option<u32>, Query, description = "Truncate each recipe preview"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Followed authors", body = SubscriptionPageSchema),
        (status = 400, description = "Invalid query", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["users"],
    operation_id = "listSubscriptions",
    security(("SessionCookie" = []))
)]
#[get("/users/subscriptions/")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let params = QueryParams::parse(req.query_string());
    let recipes_limit = params.count(RECIPES_LIMIT)?;
    let request = params.page_request(state.default_page_size)?;
    let page = state
        .subscriptions
        .subscriptions(actor, request, recipes_limit)
        .await?;
    Ok(HttpResponse::Ok().json(envelope(page.map(SubscriptionBody::from), &req)))
}

/// Fetch one user profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Profile", body = UserBody),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}/")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserBody>> {
    let view = state
        .users
        .profile(session.viewer(), user_id(&path)?)
        .await?;
    Ok(web::Json(view.into()))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    params(
        ("id" = i64, Path, description = "Author id"),
        ("recipes_limit" = Option<u32>, Query, description = "Truncate the recipe preview")
    ),
    responses(
        (status = 201, description = "Followed author", body = SubscriptionBody),
        (status = 400, description = "Self-follow", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Author not found", body = Error),
        (status = 409, description = "Already following", body = Error)
    ),
    tags = ["users"],
    operation_id = "subscribe",
    security(("SessionCookie" = []))
)]
#[post("/users/{id}/subscribe/")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let author = user_id(&path)?;
    let recipes_limit = QueryParams::parse(req.query_string()).count(RECIPES_LIMIT)?;
    state.ledger.add(Relation::follow(actor, author)).await?;
    let subscription = state
        .subscriptions
        .subscription(actor, author, recipes_limit)
        .await?;
    Ok(HttpResponse::Created().json(SubscriptionBody::from(subscription)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unfollowed"),
        (status = 400, description = "Self-follow", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not following", body = Error)
    ),
    tags = ["users"],
    operation_id = "unsubscribe",
    security(("SessionCookie" = []))
)]
#[delete("/users/{id}/subscribe/")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    state
        .ledger
        .remove(Relation::follow(actor, user_id(&path)?))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register user routes; fixed segments precede `{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(current_user)
        .service(list_subscriptions)
        .service(get_user)
        .service(subscribe)
        .service(unsubscribe);
}
