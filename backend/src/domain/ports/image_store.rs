//! Port for persisting uploaded recipe images.

use async_trait::async_trait;

use crate::domain::{ImagePayload, ImageRef};

use super::define_port_error;

define_port_error! {
    /// Errors raised while storing an image.
    pub enum ImageStoreError {
        /// The payload is not a supported base64 data URL.
        InvalidPayload => "invalid image payload: {message}",
        /// The image could not be written.
        Storage => "image storage failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Decode and store `payload`, returning a reference clients can fetch.
    async fn store(&self, payload: &ImagePayload) -> Result<ImageRef, ImageStoreError>;
}

/// Fixture that accepts any payload without writing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageStore;

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn store(&self, _payload: &ImagePayload) -> Result<ImageRef, ImageStoreError> {
        Ok(ImageRef::new("/media/recipes/fixture.png"))
    }
}
