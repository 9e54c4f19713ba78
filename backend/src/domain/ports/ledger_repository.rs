//! Port abstraction for the favourite, cart and follow ledgers.
//!
//! Uniqueness of `(kind, actor, target)` is enforced by storage. Adapters
//! surface a unique violation as [`LedgerRepositoryError::Duplicate`] so two
//! racing inserts resolve to one success and one conflict.

use std::collections::HashSet;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Relation, RelationKind, RelationTarget, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by ledger adapters.
    pub enum LedgerRepositoryError {
        /// Repository connection could not be established.
        Connection => "ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "ledger query failed: {message}",
        /// The relation already exists.
        Duplicate => "relation already exists: {message}",
        /// The actor or target row does not exist.
        MissingReference => "relation references a missing row: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn insert(&self, relation: &Relation) -> Result<(), LedgerRepositoryError>;

    /// Returns `false` when the relation was absent.
    async fn delete(&self, relation: &Relation) -> Result<bool, LedgerRepositoryError>;

    async fn exists(&self, relation: &Relation) -> Result<bool, LedgerRepositoryError>;

    /// The subset of `candidates` that `actor` holds a `kind` relation with.
    async fn existing_targets(
        &self,
        kind: RelationKind,
        actor: UserId,
        candidates: &[RelationTarget],
    ) -> Result<HashSet<RelationTarget>, LedgerRepositoryError>;

    /// Authors `actor` follows, ordered by author id.
    async fn followed_authors(
        &self,
        actor: UserId,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, LedgerRepositoryError>;
}

/// Fixture ledger that records nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLedgerRepository;

#[async_trait]
impl LedgerRepository for FixtureLedgerRepository {
    async fn insert(&self, _relation: &Relation) -> Result<(), LedgerRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _relation: &Relation) -> Result<bool, LedgerRepositoryError> {
        Ok(false)
    }

    async fn exists(&self, _relation: &Relation) -> Result<bool, LedgerRepositoryError> {
        Ok(false)
    }

    async fn existing_targets(
        &self,
        _kind: RelationKind,
        _actor: UserId,
        _candidates: &[RelationTarget],
    ) -> Result<HashSet<RelationTarget>, LedgerRepositoryError> {
        Ok(HashSet::new())
    }

    async fn followed_authors(
        &self,
        _actor: UserId,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, LedgerRepositoryError> {
        Ok(Page::empty(request))
    }
}
