//! Serves stored recipe images.
//!
//! ```text
//! GET {media_base_url}/recipes/{name}
//! ```
//!
//! Only mounted when the media base URL is a local path; an absolute URL
//! means another host serves the files.

use std::path::PathBuf;

use actix_web::http::header;
use actix_web::{HttpResponse, Scope, web};
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::Error;
use crate::inbound::http::ApiResult;

/// Directory holding the `recipes/` image folder.
#[derive(Debug, Clone)]
pub struct MediaRoot(PathBuf);

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
}

fn content_type(name: &str) -> &'static str {
    match name.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

async fn serve_image(
    root: web::Data<MediaRoot>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    if !is_safe_name(&name) {
        return Err(Error::not_found(format!("image {name} not found")));
    }
    let dir = root.0.join("recipes");
    let file = name.clone();
    let bytes = tokio::task::spawn_blocking(move || {
        Dir::open_ambient_dir(&dir, ambient_authority())?.read(&file)
    })
    .await
    .map_err(|err| Error::internal(format!("image read task failed: {err}")))?
    .map_err(|_| Error::not_found(format!("image {name} not found")))?;

    Ok(HttpResponse::Ok()
        .content_type(content_type(&name))
        .insert_header((header::CACHE_CONTROL, "public, max-age=31536000, immutable"))
        .body(bytes))
}

/// Scope serving `root/recipes/*` under `base_url`, if `base_url` is local.
pub fn media_scope(base_url: &str, root: PathBuf) -> Option<Scope> {
    if !base_url.starts_with('/') {
        return None;
    }
    Some(
        web::scope(base_url.trim_end_matches('/'))
            .app_data(web::Data::new(MediaRoot(root)))
            .route("/recipes/{name}", web::get().to(serve_image)),
    )
}
