//! Integer identifiers for persisted entities.
//!
//! Each identifier is a distinct newtype so a recipe id cannot be passed where
//! an ingredient id is expected. Values mirror the database `BIGINT` keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Failure parsing an identifier from a path segment or query value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid identifier")]
pub struct IdParseError {
    value: String,
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw key.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// The raw key.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().parse::<i64>() {
                    Ok(value) if value > 0 => Ok(Self(value)),
                    _ => Err(IdParseError {
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

define_id! {
    /// Identifier of a user profile owned by the identity provider.
    UserId
}

define_id! {
    /// Identifier of a recipe.
    RecipeId
}

define_id! {
    /// Identifier of a catalog ingredient.
    IngredientId
}

define_id! {
    /// Identifier of a catalog tag.
    TagId
}
