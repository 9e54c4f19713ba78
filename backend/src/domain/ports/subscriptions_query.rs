//! Driving port for followed authors and their recipe previews.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, RecipeSummary, UserId, UserProfile};

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub author: UserProfile,
    /// Whether the viewer follows the author. Subscription reads only list
    /// followed authors, so this is `true` there.
    pub is_subscribed: bool,
    /// Newest recipes first, truncated to the requested limit.
    pub recipes: Vec<RecipeSummary>,
    /// Total recipes by the author; never truncated.
    pub recipes_count: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Authors `actor` follows, ordered by author.
    async fn subscriptions(
        &self,
        actor: UserId,
        request: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Page<Subscription>, Error>;

    /// One author as seen by `actor`, in subscription shape.
    async fn subscription(
        &self,
        actor: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<Subscription, Error>;
}

/// Fixture with no followed authors.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionsQuery;

#[async_trait]
impl SubscriptionsQuery for FixtureSubscriptionsQuery {
    async fn subscriptions(
        &self,
        _actor: UserId,
        request: PageRequest,
        _recipes_limit: Option<u32>,
    ) -> Result<Page<Subscription>, Error> {
        Ok(Page::empty(request))
    }

    async fn subscription(
        &self,
        _actor: UserId,
        author: UserId,
        _recipes_limit: Option<u32>,
    ) -> Result<Subscription, Error> {
        Err(Error::not_found(format!("user {author} not found")))
    }
}
