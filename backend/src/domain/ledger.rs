//! Per-user relations: favourites, shopping cart entries and follows.
//!
//! The three relation kinds share one shape, an actor pointing at a target,
//! and one rule set: a pair exists at most once, removing a missing pair is an
//! error, and a user never follows themselves.

use std::fmt;

use super::ids::{RecipeId, UserId};

/// Which ledger a relation lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Favourite,
    Cart,
    Follow,
}

impl RelationKind {
    /// Stable lowercase label used in logs and error details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Favourite => "favourite",
            Self::Cart => "cart",
            Self::Follow => "follow",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a relation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationTarget {
    Recipe(RecipeId),
    Author(UserId),
}

/// A single `(kind, actor, target)` ledger entry.
///
/// Constructors pair each kind with its target type, so a follow can never
/// point at a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation {
    kind: RelationKind,
    actor: UserId,
    target: RelationTarget,
}

impl Relation {
    /// `actor` marks `recipe` as a favourite.
    pub const fn favourite(actor: UserId, recipe: RecipeId) -> Self {
        Self {
            kind: RelationKind::Favourite,
            actor,
            target: RelationTarget::Recipe(recipe),
        }
    }

    /// `actor` puts `recipe` in their shopping cart.
    pub const fn cart(actor: UserId, recipe: RecipeId) -> Self {
        Self {
            kind: RelationKind::Cart,
            actor,
            target: RelationTarget::Recipe(recipe),
        }
    }

    /// `actor` follows `author`.
    pub const fn follow(actor: UserId, author: UserId) -> Self {
        Self {
            kind: RelationKind::Follow,
            actor,
            target: RelationTarget::Author(author),
        }
    }

    pub const fn kind(&self) -> RelationKind {
        self.kind
    }

    pub const fn actor(&self) -> UserId {
        self.actor
    }

    pub const fn target(&self) -> RelationTarget {
        self.target
    }

    /// True for a follow whose actor and author coincide.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{Relation, UserId};
    ///
    /// let me = UserId::new(1);
    /// assert!(Relation::follow(me, me).is_self_follow());
    /// assert!(!Relation::follow(me, UserId::new(2)).is_self_follow());
    /// ```
    pub fn is_self_follow(&self) -> bool {
        matches!(self.target, RelationTarget::Author(author) if author == self.actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn constructors_pair_kind_with_target() {
        let actor = UserId::new(1);
        let recipe = RecipeId::new(10);

        let favourite = Relation::favourite(actor, recipe);
        assert_eq!(favourite.kind(), RelationKind::Favourite);
        assert_eq!(favourite.target(), RelationTarget::Recipe(recipe));

        let cart = Relation::cart(actor, recipe);
        assert_eq!(cart.kind(), RelationKind::Cart);
        assert_ne!(favourite, cart);

        let follow = Relation::follow(actor, UserId::new(2));
        assert_eq!(follow.target(), RelationTarget::Author(UserId::new(2)));
        assert_eq!(follow.actor(), actor);
    }

    #[rstest]
    #[case(RelationKind::Favourite, "favourite")]
    #[case(RelationKind::Cart, "cart")]
    #[case(RelationKind::Follow, "follow")]
    fn kinds_have_stable_labels(#[case] kind: RelationKind, #[case] label: &str) {
        assert_eq!(kind.to_string(), label);
    }

    #[rstest]
    fn recipe_relations_are_never_self_follows() {
        let actor = UserId::new(4);
        assert!(!Relation::favourite(actor, RecipeId::new(4)).is_self_follow());
    }
}
