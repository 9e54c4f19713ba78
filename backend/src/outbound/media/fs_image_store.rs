//! Filesystem-backed [`ImageStore`].
//!
//! Payloads arrive as `data:image/<ext>;base64,<data>` URLs. Files are named
//! by the SHA-256 digest of their bytes, so re-uploading the same picture
//! reuses one file.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use cap_std::{ambient_authority, fs::Dir};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImagePayload, ImageRef};

const RECIPE_DIR: &str = "recipes";
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "gif", "webp"];

/// Where images are written and how they are addressed publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    /// Directory that receives uploaded files.
    pub root: PathBuf,
    /// URL prefix clients use to fetch files under `root`.
    pub base_url: String,
}

/// Stores images under [`MediaConfig::root`].
#[derive(Debug, Clone)]
pub struct FsImageStore {
    config: MediaConfig,
}

impl FsImageStore {
    pub fn new(config: MediaConfig) -> Self {
        Self { config }
    }
}

/// Decoded upload ready to be written.
#[derive(Debug, PartialEq, Eq)]
struct DecodedImage {
    extension: String,
    bytes: Vec<u8>,
}

impl DecodedImage {
    fn file_name(&self) -> String {
        let digest = hex::encode(Sha256::digest(&self.bytes));
        format!("{digest}.{}", self.extension)
    }
}

fn decode(payload: &str) -> Result<DecodedImage, ImageStoreError> {
    let (header, data) = payload
        .split_once(',')
        .ok_or_else(|| ImageStoreError::invalid_payload("expected a data URL"))?;
    let format = header
        .strip_prefix("data:image/")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .ok_or_else(|| ImageStoreError::invalid_payload("expected data:image/<ext>;base64"))?;
    let extension = format.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(ImageStoreError::invalid_payload(format!(
            "unsupported image type '{extension}'"
        )));
    }
    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|err| ImageStoreError::invalid_payload(err.to_string()))?;
    if bytes.is_empty() {
        return Err(ImageStoreError::invalid_payload("image is empty"));
    }
    Ok(DecodedImage { extension, bytes })
}

fn write(root: PathBuf, name: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
    let storage = |err: std::io::Error| ImageStoreError::storage(err.to_string());
    std::fs::create_dir_all(&root).map_err(storage)?;
    let media = Dir::open_ambient_dir(&root, ambient_authority()).map_err(storage)?;
    media.create_dir_all(RECIPE_DIR).map_err(storage)?;
    let recipes = media.open_dir(RECIPE_DIR).map_err(storage)?;
    if recipes.exists(name) {
        debug!(name, "image already stored");
        return Ok(());
    }
    recipes.write(name, bytes).map_err(storage)
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(&self, payload: &ImagePayload) -> Result<ImageRef, ImageStoreError> {
        let image = decode(payload.as_str())?;
        let name = image.file_name();
        let root = self.config.root.clone();
        let file = name.clone();
        tokio::task::spawn_blocking(move || write(root, &file, &image.bytes))
            .await
            .map_err(|err| ImageStoreError::storage(err.to_string()))?
            .inspect_err(|err| warn!(error = %err, "failed to write image"))?;
        let base = self.config.base_url.trim_end_matches('/');
        Ok(ImageRef::new(format!("{base}/{RECIPE_DIR}/{name}")))
    }
}
