//! Ledger toggles for favourites, cart entries and follows.
//!
//! One service handles all three relation kinds. The follow self-check runs
//! before any repository call; target existence is checked next so a missing
//! recipe or author reports `NotFound` rather than a storage error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{
    LedgerCommand, LedgerReceipt, LedgerRepository, LedgerRepositoryError, RecipeRepository,
    TargetProjection, UserRepository,
};
use crate::domain::recipe_service::map_recipe_error;
use crate::domain::users_service::map_user_error;
use crate::domain::{Error, Relation, RelationTarget};

/// Ledger service implementing [`LedgerCommand`].
#[derive(Clone)]
pub struct LedgerService<L, R, U> {
    ledger: Arc<L>,
    recipes: Arc<R>,
    users: Arc<U>,
}

impl<L, R, U> LedgerService<L, R, U> {
    pub fn new(ledger: Arc<L>, recipes: Arc<R>, users: Arc<U>) -> Self {
        Self {
            ledger,
            recipes,
            users,
        }
    }
}

pub(crate) fn map_ledger_error(error: LedgerRepositoryError) -> Error {
    match error {
        LedgerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("ledger unavailable: {message}"))
        }
        LedgerRepositoryError::Query { message } => {
            Error::internal(format!("ledger error: {message}"))
        }
        LedgerRepositoryError::Duplicate { .. } => Error::conflict("relation already exists"),
        LedgerRepositoryError::MissingReference { message } => Error::not_found(message),
    }
}

fn relation_details(relation: &Relation) -> serde_json::Value {
    let (field, id) = match relation.target() {
        RelationTarget::Recipe(id) => ("recipe", id.get()),
        RelationTarget::Author(id) => ("author", id.get()),
    };
    json!({ "kind": relation.kind().as_str(), field: id })
}

impl<L, R, U> LedgerService<L, R, U>
where
    L: LedgerRepository,
    R: RecipeRepository,
    U: UserRepository,
{
    async fn project_target(&self, relation: &Relation) -> Result<TargetProjection, Error> {
        match relation.target() {
            RelationTarget::Recipe(id) => self
                .recipes
                .find_summary(id)
                .await
                .map_err(map_recipe_error)?
                .map(TargetProjection::Recipe)
                .ok_or_else(|| Error::not_found(format!("recipe {id} not found"))),
            RelationTarget::Author(id) => self
                .users
                .find_profile(id)
                .await
                .map_err(map_user_error)?
                .map(TargetProjection::Author)
                .ok_or_else(|| Error::not_found(format!("user {id} not found"))),
        }
    }
}

#[async_trait]
impl<L, R, U> LedgerCommand for LedgerService<L, R, U>
where
    L: LedgerRepository,
    R: RecipeRepository,
    U: UserRepository,
{
    async fn add(&self, relation: Relation) -> Result<LedgerReceipt, Error> {
        if relation.is_self_follow() {
            return Err(Error::invalid_request("cannot follow self")
                .with_details(json!({ "field": "author" })));
        }
        let target = self.project_target(&relation).await?;
        self.ledger.insert(&relation).await.map_err(|err| {
            debug!(kind = %relation.kind(), error = %err, "ledger insert rejected");
            map_ledger_error(err).with_details(relation_details(&relation))
        })?;
        Ok(LedgerReceipt { relation, target })
    }

    async fn remove(&self, relation: Relation) -> Result<(), Error> {
        if relation.is_self_follow() {
            return Err(Error::invalid_request("cannot follow self")
                .with_details(json!({ "field": "author" })));
        }
        self.project_target(&relation).await?;
        let removed = self
            .ledger
            .delete(&relation)
            .await
            .map_err(map_ledger_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!("{} relation does not exist", relation.kind()))
                .with_details(relation_details(&relation)))
        }
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
