//! Tag and ingredient catalog endpoints.
//!
//! ```text
//! GET /api/tags/
//! GET /api/tags/{id}/
//! GET /api/ingredients/?name=му
//! GET /api/ingredients/{id}/
//! ```
//!
//! Catalog reads are public and not paginated.

use actix_web::{HttpRequest, get, web};

use crate::domain::{Error, IngredientSearch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::recipes_dto::{IngredientBody, TagBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{QueryParams, path_id};

const NAME_PARAM: &str = "name";

/// List every tag.
#[utoipa::path(
    get,
    path = "/api/tags/",
    responses(
        (status = 200, description = "Tags", body = [TagBody]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags/")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagBody>>> {
    let tags = state.catalog.list_tags().await?;
    Ok(web::Json(tags.into_iter().map(TagBody::from).collect()))
}

/// Fetch one tag.
#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagBody),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}/")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<TagBody>> {
    let tag = state.catalog.tag(path_id(&path, "tag")?).await?;
    Ok(web::Json(tag.into()))
}

/// List ingredients, optionally filtered by a case-insensitive name prefix.
#[utoipa::path(
    get,
    path = "/api/ingredients/",
    params(("name" = Option<String>, Query, description = "Name prefix")),
    responses(
        (status = 200, description = "Ingredients", body = [IngredientBody]),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<IngredientBody>>> {
    let params = QueryParams::parse(req.query_string());
    let search = IngredientSearch::new(params.first(NAME_PARAM));
    let ingredients = state.catalog.list_ingredients(&search).await?;
    Ok(web::Json(
        ingredients.into_iter().map(IngredientBody::from).collect(),
    ))
}

/// Fetch one ingredient.
#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientBody),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["catalog"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}/")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IngredientBody>> {
    let ingredient = state
        .catalog
        .ingredient(path_id(&path, "ingredient")?)
        .await?;
    Ok(web::Json(ingredient.into()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tags)
        .service(get_tag)
        .service(list_ingredients)
        .service(get_ingredient);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::state::HttpStatePorts;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn get(uri: &str) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::from(HttpStatePorts::default())))
                .service(web::scope("/api").configure(configure)),
        )
        .await;
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await
    }

    #[actix_web::test]
    async fn lists_tags_in_wire_shape() {
        let response = get("/api/tags/").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get(0),
            Some(&json!({"id": 1, "name": "суп", "color": "#fff68f", "slug": "soup"}))
        );
    }

    #[rstest]
    #[case("/api/tags/2/", StatusCode::OK)]
    #[case("/api/tags/9/", StatusCode::NOT_FOUND)]
    #[case("/api/tags/soup/", StatusCode::NOT_FOUND)]
    #[case("/api/ingredients/1/", StatusCode::OK)]
    #[case("/api/ingredients/9/", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn detail_routes(#[case] uri: &str, #[case] expected: StatusCode) {
        assert_eq!(get(uri).await.status(), expected);
    }

    #[actix_web::test]
    async fn searches_ingredients_by_prefix() {
        let response = get("/api/ingredients/?name=%D0%9C%D0%A3").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body,
            json!([{"id": 1, "name": "мука", "measurement_unit": "г"}])
        );
    }
}
