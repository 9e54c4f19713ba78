//! Driving port for user profile reads.
//!
//! Profiles carry an `is_subscribed` flag relative to the viewer, which is
//! always `false` for anonymous viewers and for a user looking at themselves.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{AuthorView, Error, UserId, UserProfile, Viewer};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    async fn list_users(
        &self,
        viewer: Viewer,
        request: PageRequest,
    ) -> Result<Page<AuthorView>, Error>;

    /// Fails with `NotFound` for an unknown id.
    async fn profile(&self, viewer: Viewer, id: UserId) -> Result<AuthorView, Error>;

    /// The authenticated user's own profile.
    async fn me(&self, actor: UserId) -> Result<AuthorView, Error>;
}

/// Fixture that knows a single user.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsersQuery;

impl FixtureUsersQuery {
    fn profile_for(id: UserId) -> AuthorView {
        AuthorView {
            profile: UserProfile {
                id,
                email: "ada@example.com".to_owned(),
                username: "ada".to_owned(),
                first_name: Some("Ada".to_owned()),
                last_name: Some("Lovelace".to_owned()),
            },
            is_subscribed: false,
        }
    }
}

#[async_trait]
impl UsersQuery for FixtureUsersQuery {
    async fn list_users(
        &self,
        _viewer: Viewer,
        request: PageRequest,
    ) -> Result<Page<AuthorView>, Error> {
        Ok(Page::new(
            vec![Self::profile_for(UserId::new(1))],
            1,
            request,
        ))
    }

    async fn profile(&self, _viewer: Viewer, id: UserId) -> Result<AuthorView, Error> {
        Ok(Self::profile_for(id))
    }

    async fn me(&self, actor: UserId) -> Result<AuthorView, Error> {
        Ok(Self::profile_for(actor))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_echoes_requested_id() {
        let view = FixtureUsersQuery
            .profile(Viewer::Anonymous, UserId::new(7))
            .await
            .expect("profile");
        assert_eq!(view.profile.id, UserId::new(7));
        assert!(!view.is_subscribed);
    }
}
