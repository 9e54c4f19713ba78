//! HTTP inbound adapter exposing REST endpoints.

pub mod catalog;
pub mod error;
pub mod health;
pub mod media;
mod paging;
pub mod recipes;
pub mod recipes_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::web;
use serde_json::json;

use crate::domain::Error;

pub use error::ApiResult;

/// JSON extractor configuration that reports malformed bodies as domain
/// `invalid_request` errors instead of Actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        Error::invalid_request("request body is not valid JSON for this endpoint")
            .with_details(json!({ "reason": message }))
            .into()
    })
}

/// Register every `/api` route.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(catalog::configure)
        .configure(recipes::configure)
        .configure(users::configure);
}
