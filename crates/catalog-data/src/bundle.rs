//! Catalog bundle types and JSON parsing.

use std::collections::HashSet;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use serde::Deserialize;

use crate::error::BundleError;
use crate::validation::{
    INGREDIENT_NAME_MAX, MEASUREMENT_UNIT_MAX, TAG_NAME_MAX, is_valid_hex_color, is_valid_slug,
};

/// Current supported bundle version.
const SUPPORTED_VERSION: u32 = 1;

/// An ingredient row to load into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct IngredientSeed {
    /// Display name.
    pub name: String,
    /// Unit the amount is measured in.
    pub measurement_unit: String,
}

/// A tag row to load into the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagSeed {
    /// Display name.
    pub name: String,
    /// Hex colour, `#RGB` or `#RRGGBB`.
    pub color: String,
    /// Unique slug used in recipe filters.
    pub slug: String,
}

/// A validated catalog bundle.
///
/// Ingredients are trimmed and deduplicated by `(name, measurement_unit)`
/// keeping first occurrences, mirroring the get-or-create load semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBundle {
    ingredients: Vec<IngredientSeed>,
    tags: Vec<TagSeed>,
}

#[derive(Debug, Deserialize)]
struct RawCatalogBundle {
    version: u32,
    #[serde(default)]
    ingredients: Vec<IngredientSeed>,
    #[serde(default)]
    tags: Vec<TagSeed>,
}

impl CatalogBundle {
    /// Parse a bundle from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError`] if the JSON is malformed, the version is
    /// unsupported, or any entry breaks a field rule.
    pub fn from_json(json: &str) -> Result<Self, BundleError> {
        let raw: RawCatalogBundle =
            serde_json::from_str(json).map_err(|e| BundleError::Parse {
                message: e.to_string(),
            })?;
        Self::from_raw(raw)
    }

    /// Load a bundle from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Io`] if the file cannot be read, or any error
    /// from [`CatalogBundle::from_json`].
    pub fn from_file(path: &Utf8Path) -> Result<Self, BundleError> {
        let io_error = |message: String| BundleError::Io {
            path: path.as_std_path().to_path_buf(),
            message,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("path does not name a file".to_owned()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|e| io_error(e.to_string()))?;
        let contents = dir
            .read_to_string(file_name)
            .map_err(|e| io_error(e.to_string()))?;
        Self::from_json(&contents)
    }

    /// Ingredients to load, in bundle order.
    #[must_use]
    pub fn ingredients(&self) -> &[IngredientSeed] {
        &self.ingredients
    }

    /// Tags to load, in bundle order.
    #[must_use]
    pub fn tags(&self) -> &[TagSeed] {
        &self.tags
    }

    fn from_raw(raw: RawCatalogBundle) -> Result<Self, BundleError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(BundleError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        let mut seen = HashSet::new();
        let mut ingredients = Vec::with_capacity(raw.ingredients.len());
        for (index, seed) in raw.ingredients.into_iter().enumerate() {
            let seed = normalise_ingredient(index, seed)?;
            if seen.insert(seed.clone()) {
                ingredients.push(seed);
            }
        }

        let mut slugs = HashSet::new();
        let mut tags = Vec::with_capacity(raw.tags.len());
        for (index, seed) in raw.tags.into_iter().enumerate() {
            let seed = normalise_tag(index, seed)?;
            if !slugs.insert(seed.slug.clone()) {
                return Err(BundleError::DuplicateTagSlug { slug: seed.slug });
            }
            tags.push(seed);
        }

        Ok(Self { ingredients, tags })
    }
}

fn normalise_ingredient(index: usize, seed: IngredientSeed) -> Result<IngredientSeed, BundleError> {
    let invalid = |reason: &str| BundleError::InvalidIngredient {
        index,
        reason: reason.to_owned(),
    };
    let name = seed.name.trim().to_owned();
    let measurement_unit = seed.measurement_unit.trim().to_owned();
    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.chars().count() > INGREDIENT_NAME_MAX {
        return Err(invalid("name is too long"));
    }
    if measurement_unit.is_empty() {
        return Err(invalid("measurement unit must not be empty"));
    }
    if measurement_unit.chars().count() > MEASUREMENT_UNIT_MAX {
        return Err(invalid("measurement unit is too long"));
    }
    Ok(IngredientSeed {
        name,
        measurement_unit,
    })
}

fn normalise_tag(index: usize, seed: TagSeed) -> Result<TagSeed, BundleError> {
    let invalid = |reason: &str| BundleError::InvalidTag {
        index,
        reason: reason.to_owned(),
    };
    let name = seed.name.trim().to_owned();
    let color = seed.color.trim().to_owned();
    let slug = seed.slug.trim().to_owned();
    if name.is_empty() || name.chars().count() > TAG_NAME_MAX {
        return Err(invalid("name must be between 1 and 30 characters"));
    }
    if !is_valid_hex_color(&color) {
        return Err(invalid("color must be a hex colour such as #a0db8e"));
    }
    if !is_valid_slug(&slug) {
        return Err(invalid("slug must use letters, digits, '-' or '_'"));
    }
    Ok(TagSeed { name, color, slug })
}
