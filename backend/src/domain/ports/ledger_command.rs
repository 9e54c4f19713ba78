//! Driving port for ledger toggles.

use async_trait::async_trait;

use crate::domain::{Error, RecipeSummary, Relation, UserProfile};

/// Projection of the relation target returned after an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetProjection {
    Recipe(RecipeSummary),
    Author(UserProfile),
}

/// Result of a successful add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReceipt {
    pub relation: Relation,
    pub target: TargetProjection,
}

/// Add and remove favourites, cart entries and follows.
///
/// Neither operation is idempotent: adding twice fails with `Conflict` and
/// removing an absent relation fails with `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerCommand: Send + Sync {
    async fn add(&self, relation: Relation) -> Result<LedgerReceipt, Error>;

    async fn remove(&self, relation: Relation) -> Result<(), Error>;
}

/// Fixture that rejects every toggle.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLedgerCommand;

#[async_trait]
impl LedgerCommand for FixtureLedgerCommand {
    async fn add(&self, _relation: Relation) -> Result<LedgerReceipt, Error> {
        Err(Error::service_unavailable("ledger is not configured"))
    }

    async fn remove(&self, _relation: Relation) -> Result<(), Error> {
        Err(Error::service_unavailable("ledger is not configured"))
    }
}
