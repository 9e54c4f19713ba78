//! Port abstraction for reading user profiles.
//!
//! Accounts are owned by the identity provider; this service never writes
//! them.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection => "user repository connection failed: {message}",
        /// Query failed during execution.
        Query => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Window of profiles ordered by id.
    async fn list_profiles(
        &self,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, UserRepositoryError>;
}

/// Fixture with no registered users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_profile(&self, _id: UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        Ok(None)
    }

    async fn list_profiles(
        &self,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, UserRepositoryError> {
        Ok(Page::empty(request))
    }
}
