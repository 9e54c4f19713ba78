//! Recipe endpoints, including favourite and cart toggles and the shopping
//! list export.
//!
//! ```text
//! GET    /api/recipes/?author=1&tags=soup&is_favorited=1&page=2&limit=6
//! POST   /api/recipes/
//! GET    /api/recipes/download_shopping_cart/
//! GET    /api/recipes/{id}/
//! PATCH  /api/recipes/{id}/
//! DELETE /api/recipes/{id}/
//! POST   /api/recipes/{id}/favorite/
//! DELETE /api/recipes/{id}/favorite/
//! POST   /api/recipes/{id}/shopping_cart/
//! DELETE /api/recipes/{id}/shopping_cart/
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};

use crate::domain::ports::{LedgerReceipt, TargetProjection};
use crate::domain::{Error, RecipeDraft, RecipeId, RecipeListQuery, Relation};
use crate::inbound::http::ApiResult;
use crate::inbound::http::paging::envelope;
use crate::inbound::http::recipes_dto::{RecipeView, RecipeWriteRequest};
use crate::inbound::http::schemas::RecipePageSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, QueryParams, path_id};

const AUTHOR: FieldName = FieldName::new("author");
const IS_FAVORITED: FieldName = FieldName::new("is_favorited");
const IS_IN_SHOPPING_CART: FieldName = FieldName::new("is_in_shopping_cart");
const TAGS_PARAM: &str = "tags";

fn recipe_id(raw: &str) -> Result<RecipeId, Error> {
    path_id(raw, "recipe")
}

fn list_query(params: &QueryParams) -> Result<RecipeListQuery, Error> {
    Ok(RecipeListQuery {
        author: params.user_id(AUTHOR)?,
        tags: params.all(TAGS_PARAM),
        is_favorited: params.flag(IS_FAVORITED)?,
        is_in_shopping_cart: params.flag(IS_IN_SHOPPING_CART)?,
    })
}

fn receipt_summary(receipt: LedgerReceipt) -> Result<RecipeView, Error> {
    match receipt.target {
        TargetProjection::Recipe(summary) => Ok(RecipeView::summary(summary)),
        TargetProjection::Author(_) => Err(Error::internal(
            "recipe relation resolved to an author projection",
        )),
    }
}

/// List recipes with optional filters.
#[utoipa::path(
    get,
    path = "/api/recipes/",
    params(
        ("author" = Option<i64>, Query, description = "Only recipes by this author"),
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs; repeat for any-of matching"),
        ("is_favorited" = Option<u8>, Query, description = "1 to list only the viewer's favourites"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "1 to list only the viewer's cart"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Recipes, newest first", body = RecipePageSchema),
        (status = 400, description = "Invalid filter or window", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes/")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let params = QueryParams::parse(req.query_string());
    let query = list_query(&params)?;
    let request = params.page_request(state.default_page_size)?;
    let page = state
        .recipes_query
        .list(session.viewer(), &query, request)
        .await?;
    Ok(HttpResponse::Ok().json(envelope(page.map(RecipeView::detail), &req)))
}

/// Create a recipe authored by the session user.
#[utoipa::path(
    post,
    path = "/api/recipes/",
    request_body = RecipeWriteRequest,
    responses(
        (status = 201, description = "Created recipe", body = RecipeView),
        (status = 400, description = "Invalid recipe", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown ingredient or tag", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("SessionCookie" = []))
)]
#[post("/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeWriteRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let detail = state
        .recipes
        .create(actor, RecipeDraft::from(payload.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(RecipeView::detail(detail)))
}

/// Export the aggregated shopping list as a text attachment.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    responses(
        (
            status = 200,
            description = "Shopping list",
            content_type = "text/plain",
            body = String,
            headers(("Content-Disposition" = String, description = "attachment; filename=\"listbuy.txt\""))
        ),
        (status = 400, description = "Cart is empty", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "downloadShoppingCart",
    security(("SessionCookie" = []))
)]
#[get("/recipes/download_shopping_cart/")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let document = state.shopping_cart.export(actor).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.filename)],
        })
        .body(document.body))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeView),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipeView>> {
    let id = recipe_id(&path)?;
    let detail = state.recipes_query.get(session.viewer(), id).await?;
    Ok(web::Json(RecipeView::detail(detail)))
}

/// Replace a recipe's fields, composition and tags.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeWriteRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeView),
        (status = 400, description = "Invalid recipe", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe",
    security(("SessionCookie" = []))
)]
#[patch("/recipes/{id}/")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeWriteRequest>,
) -> ApiResult<web::Json<RecipeView>> {
    let actor = session.require_user_id()?;
    let id = recipe_id(&path)?;
    let detail = state
        .recipes
        .update(actor, id, RecipeDraft::from(payload.into_inner()))
        .await?;
    Ok(web::Json(RecipeView::detail(detail)))
}

/// Delete a recipe.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = recipe_id(&path)?;
    state.recipes.delete(actor, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn add_relation(state: &HttpState, relation: Relation) -> ApiResult<HttpResponse> {
    let receipt = state.ledger.add(relation).await?;
    Ok(HttpResponse::Created().json(receipt_summary(receipt)?))
}

async fn remove_relation(state: &HttpState, relation: Relation) -> ApiResult<HttpResponse> {
    state.ledger.remove(relation).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a recipe to the session user's favourites.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Favourited recipe", body = RecipeView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Recipe not found", body = Error),
        (status = 409, description = "Already a favourite", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite",
    security(("SessionCookie" = []))
)]
#[post("/recipes/{id}/favorite/")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    add_relation(&state, Relation::favourite(actor, recipe_id(&path)?)).await
}

/// Remove a recipe from the session user's favourites.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not a favourite", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}/favorite/")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    remove_relation(&state, Relation::favourite(actor, recipe_id(&path)?)).await
}

/// Put a recipe in the session user's shopping cart.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Recipe added to the cart", body = RecipeView),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Recipe not found", body = Error),
        (status = 409, description = "Already in the cart", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "addToShoppingCart",
    security(("SessionCookie" = []))
)]
#[post("/recipes/{id}/shopping_cart/")]
pub async fn add_to_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    add_relation(&state, Relation::cart(actor, recipe_id(&path)?)).await
}

/// Take a recipe out of the session user's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not in the cart", body = Error)
    ),
    tags = ["recipes"],
    operation_id = "removeFromShoppingCart",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}/shopping_cart/")]
pub async fn remove_from_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    remove_relation(&state, Relation::cart(actor, recipe_id(&path)?)).await
}

/// Register recipe routes. The export route precedes `{id}` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_recipes)
        .service(create_recipe)
        .service(download_shopping_cart)
        .service(get_recipe)
        .service(update_recipe)
        .service(delete_recipe)
        .service(add_favorite)
        .service(remove_favorite)
        .service(add_to_shopping_cart)
        .service(remove_from_shopping_cart);
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
