//! Media adapters for uploaded recipe images.

mod fs_image_store;

pub use fs_image_store::{FsImageStore, MediaConfig};
