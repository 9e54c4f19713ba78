//! PostgreSQL-backed favourite, cart and follow ledgers.
//!
//! Each relation kind lives in its own table with a unique `(user, target)`
//! constraint, so concurrent duplicate inserts resolve in the database.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};

use crate::domain::ports::{LedgerRepository, LedgerRepositoryError};
use crate::domain::{
    RecipeId, Relation, RelationKind, RelationTarget, UserId, UserProfile,
};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, count_to_total, limit_offset,
};
use super::diesel_user_repository::row_to_profile;
use super::models::{NewCartEntryRow, NewFavouriteRow, NewFollowRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cart_entries, favourites, follows, users};

/// Diesel-backed implementation of [`LedgerRepository`].
#[derive(Clone)]
pub struct DieselLedgerRepository {
    pool: DbPool,
}

impl DieselLedgerRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> LedgerRepositoryError {
    LedgerRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> LedgerRepositoryError {
    match classify_diesel_error(error, "ledger write") {
        DieselFailure::Connection => LedgerRepositoryError::connection("database connection error"),
        DieselFailure::Query { message } => LedgerRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint } => {
            LedgerRepositoryError::duplicate(constraint)
        }
        DieselFailure::ForeignKeyViolation { constraint } => {
            LedgerRepositoryError::missing_reference(constraint)
        }
    }
}

/// Split a relation into the raw `(actor, target)` key of its table.
fn keys(relation: &Relation) -> Result<(i64, i64), LedgerRepositoryError> {
    let actor = relation.actor().get();
    match (relation.kind(), relation.target()) {
        (RelationKind::Favourite | RelationKind::Cart, RelationTarget::Recipe(recipe)) => {
            Ok((actor, recipe.get()))
        }
        (RelationKind::Follow, RelationTarget::Author(author)) => Ok((actor, author.get())),
        (kind, target) => Err(LedgerRepositoryError::query(format!(
            "{kind} relation cannot point at {target:?}"
        ))),
    }
}

fn recipe_candidates(candidates: &[RelationTarget]) -> Vec<i64> {
    candidates
        .iter()
        .filter_map(|target| match target {
            RelationTarget::Recipe(id) => Some(id.get()),
            RelationTarget::Author(_) => None,
        })
        .collect()
}

fn author_candidates(candidates: &[RelationTarget]) -> Vec<i64> {
    candidates
        .iter()
        .filter_map(|target| match target {
            RelationTarget::Author(id) => Some(id.get()),
            RelationTarget::Recipe(_) => None,
        })
        .collect()
}

async fn relation_exists(
    conn: &mut AsyncPgConnection,
    kind: RelationKind,
    actor: i64,
    target: i64,
) -> Result<bool, diesel::result::Error> {
    match kind {
        RelationKind::Favourite => {
            diesel::select(exists(
                favourites::table
                    .filter(favourites::user_id.eq(actor))
                    .filter(favourites::recipe_id.eq(target)),
            ))
            .get_result(conn)
            .await
        }
        RelationKind::Cart => {
            diesel::select(exists(
                cart_entries::table
                    .filter(cart_entries::user_id.eq(actor))
                    .filter(cart_entries::recipe_id.eq(target)),
            ))
            .get_result(conn)
            .await
        }
        RelationKind::Follow => {
            diesel::select(exists(
                follows::table
                    .filter(follows::user_id.eq(actor))
                    .filter(follows::author_id.eq(target)),
            ))
            .get_result(conn)
            .await
        }
    }
}

#[async_trait]
impl LedgerRepository for DieselLedgerRepository {
    async fn insert(&self, relation: &Relation) -> Result<(), LedgerRepositoryError> {
        let (user_id, target) = keys(relation)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let result = match relation.kind() {
            RelationKind::Favourite => {
                diesel::insert_into(favourites::table)
                    .values(&NewFavouriteRow {
                        user_id,
                        recipe_id: target,
                    })
                    .execute(&mut conn)
                    .await
            }
            RelationKind::Cart => {
                diesel::insert_into(cart_entries::table)
                    .values(&NewCartEntryRow {
                        user_id,
                        recipe_id: target,
                    })
                    .execute(&mut conn)
                    .await
            }
            RelationKind::Follow => {
                diesel::insert_into(follows::table)
                    .values(&NewFollowRow {
                        user_id,
                        author_id: target,
                    })
                    .execute(&mut conn)
                    .await
            }
        };
        result.map(|_| ()).map_err(map_diesel_error)
    }

    async fn delete(&self, relation: &Relation) -> Result<bool, LedgerRepositoryError> {
        let (user_id, target) = keys(relation)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = match relation.kind() {
            RelationKind::Favourite => {
                diesel::delete(
                    favourites::table
                        .filter(favourites::user_id.eq(user_id))
                        .filter(favourites::recipe_id.eq(target)),
                )
                .execute(&mut conn)
                .await
            }
            RelationKind::Cart => {
                diesel::delete(
                    cart_entries::table
                        .filter(cart_entries::user_id.eq(user_id))
                        .filter(cart_entries::recipe_id.eq(target)),
                )
                .execute(&mut conn)
                .await
            }
            RelationKind::Follow => {
                diesel::delete(
                    follows::table
                        .filter(follows::user_id.eq(user_id))
                        .filter(follows::author_id.eq(target)),
                )
                .execute(&mut conn)
                .await
            }
        }
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn exists(&self, relation: &Relation) -> Result<bool, LedgerRepositoryError> {
        let (user_id, target) = keys(relation)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        relation_exists(&mut conn, relation.kind(), user_id, target)
            .await
            .map_err(map_diesel_error)
    }

    async fn existing_targets(
        &self,
        kind: RelationKind,
        actor: UserId,
        candidates: &[RelationTarget],
    ) -> Result<HashSet<RelationTarget>, LedgerRepositoryError> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found = match kind {
            RelationKind::Favourite => favourites::table
                .filter(favourites::user_id.eq(actor.get()))
                .filter(favourites::recipe_id.eq_any(recipe_candidates(candidates)))
                .select(favourites::recipe_id)
                .load::<i64>(&mut conn)
                .await
                .map(|ids| {
                    ids.into_iter()
                        .map(|id| RelationTarget::Recipe(RecipeId::new(id)))
                        .collect()
                }),
            RelationKind::Cart => cart_entries::table
                .filter(cart_entries::user_id.eq(actor.get()))
                .filter(cart_entries::recipe_id.eq_any(recipe_candidates(candidates)))
                .select(cart_entries::recipe_id)
                .load::<i64>(&mut conn)
                .await
                .map(|ids| {
                    ids.into_iter()
                        .map(|id| RelationTarget::Recipe(RecipeId::new(id)))
                        .collect()
                }),
            RelationKind::Follow => follows::table
                .filter(follows::user_id.eq(actor.get()))
                .filter(follows::author_id.eq_any(author_candidates(candidates)))
                .select(follows::author_id)
                .load::<i64>(&mut conn)
                .await
                .map(|ids| {
                    ids.into_iter()
                        .map(|id| RelationTarget::Author(UserId::new(id)))
                        .collect()
                }),
        };
        found.map_err(map_diesel_error)
    }

    async fn followed_authors(
        &self,
        actor: UserId,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, LedgerRepositoryError> {
        let (limit, offset) = limit_offset(request);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = follows::table
            .filter(follows::user_id.eq(actor.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = follows::table
            .inner_join(users::table)
            .filter(follows::user_id.eq(actor.get()))
            .select(UserRow::as_select())
            .order_by(users::id)
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(
            rows.into_iter().map(row_to_profile).collect(),
            count_to_total(total),
            request,
        ))
    }
}
