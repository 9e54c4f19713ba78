//! PostgreSQL-backed read adapter for user profiles.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{Page, PageRequest};

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{UserId, UserProfile};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, count_to_total, limit_offset,
};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    UserRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    match classify_diesel_error(error, "user read") {
        DieselFailure::Connection => UserRepositoryError::connection("database connection error"),
        DieselFailure::Query { message } => UserRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint }
        | DieselFailure::ForeignKeyViolation { constraint } => {
            UserRepositoryError::query(format!("unexpected constraint violation: {constraint}"))
        }
    }
}

pub(crate) fn row_to_profile(row: UserRow) -> UserProfile {
    UserProfile {
        id: UserId::new(row.id),
        email: row.email,
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn list_profiles(
        &self,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, UserRepositoryError> {
        let (limit, offset) = limit_offset(request);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
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
