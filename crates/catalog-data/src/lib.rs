//! Catalog bundles used to bootstrap Foodgram reference data.
//!
//! A bundle is a JSON document listing ingredients (name and measurement
//! unit) and recipe tags (name, hex colour, slug). This crate parses and
//! validates bundles without depending on backend domain types, so the
//! loader binary and tests can share one definition of a well-formed catalog.
//!
//! # Example
//!
//! ```
//! use catalog_data::CatalogBundle;
//!
//! let json = r##"{
//!     "version": 1,
//!     "ingredients": [
//!         {"name": "мука", "measurement_unit": "г"},
//!         {"name": "мука", "measurement_unit": "г"}
//!     ],
//!     "tags": [{"name": "суп", "color": "#fff68f", "slug": "soup"}]
//! }"##;
//!
//! let bundle = CatalogBundle::from_json(json).expect("valid bundle");
//! assert_eq!(bundle.ingredients().len(), 1);
//! assert_eq!(bundle.tags()[0].slug, "soup");
//! ```

mod bundle;
mod error;
mod validation;

pub use bundle::{CatalogBundle, IngredientSeed, TagSeed};
pub use error::BundleError;
pub use validation::{
    INGREDIENT_NAME_MAX, MEASUREMENT_UNIT_MAX, TAG_NAME_MAX, TAG_SLUG_MAX, is_valid_hex_color,
    is_valid_slug,
};
