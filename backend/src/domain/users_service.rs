//! User profile and subscription reads.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ledger_service::map_ledger_error;
use crate::domain::ports::{
    LedgerRepository, RecipeRepository, Subscription, SubscriptionsQuery, UserRepository,
    UserRepositoryError, UsersQuery,
};
use crate::domain::recipe_service::map_recipe_error;
use crate::domain::{
    AuthorView, Error, Relation, RelationKind, RelationTarget, UserId, UserProfile, Viewer,
};

/// Users service implementing [`UsersQuery`] and [`SubscriptionsQuery`].
#[derive(Clone)]
pub struct UsersService<U, L, R> {
    users: Arc<U>,
    ledger: Arc<L>,
    recipes: Arc<R>,
}

impl<U, L, R> UsersService<U, L, R> {
    pub fn new(users: Arc<U>, ledger: Arc<L>, recipes: Arc<R>) -> Self {
        Self {
            users,
            ledger,
            recipes,
        }
    }
}

pub(crate) fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

impl<U, L, R> UsersService<U, L, R>
where
    U: UserRepository,
    L: LedgerRepository,
    R: RecipeRepository,
{
    async fn find(&self, id: UserId) -> Result<UserProfile, Error> {
        self.users
            .find_profile(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| user_not_found(id))
    }

    async fn is_subscribed(&self, viewer: Viewer, author: UserId) -> Result<bool, Error> {
        match viewer.user_id() {
            Some(actor) if actor != author => self
                .ledger
                .exists(&Relation::follow(actor, author))
                .await
                .map_err(map_ledger_error),
            _ => Ok(false),
        }
    }

    async fn with_recipes(
        &self,
        author: UserProfile,
        is_subscribed: bool,
        recipes_limit: Option<u32>,
    ) -> Result<Subscription, Error> {
        let recipes = self
            .recipes
            .summaries_by_author(author.id, recipes_limit)
            .await
            .map_err(map_recipe_error)?;
        let recipes_count = self
            .recipes
            .count_by_author(author.id)
            .await
            .map_err(map_recipe_error)?;
        Ok(Subscription {
            author,
            is_subscribed,
            recipes,
            recipes_count,
        })
    }
}

#[async_trait]
impl<U, L, R> UsersQuery for UsersService<U, L, R>
where
    U: UserRepository,
    L: LedgerRepository,
    R: RecipeRepository,
{
    async fn list_users(
        &self,
        viewer: Viewer,
        request: PageRequest,
    ) -> Result<Page<AuthorView>, Error> {
        let page = self
            .users
            .list_profiles(request)
            .await
            .map_err(map_user_error)?;

        let follows = match viewer.user_id() {
            Some(actor) => {
                let candidates: Vec<RelationTarget> = page
                    .items()
                    .iter()
                    .filter(|profile| profile.id != actor)
                    .map(|profile| RelationTarget::Author(profile.id))
                    .collect();
                if candidates.is_empty() {
                    HashSet::new()
                } else {
                    self.ledger
                        .existing_targets(RelationKind::Follow, actor, &candidates)
                        .await
                        .map_err(map_ledger_error)?
                }
            }
            None => HashSet::new(),
        };

        Ok(page.map(|profile| AuthorView {
            is_subscribed: follows.contains(&RelationTarget::Author(profile.id)),
            profile,
        }))
    }

    async fn profile(&self, viewer: Viewer, id: UserId) -> Result<AuthorView, Error> {
        let profile = self.find(id).await?;
        let is_subscribed = self.is_subscribed(viewer, id).await?;
        Ok(AuthorView {
            profile,
            is_subscribed,
        })
    }

    async fn me(&self, actor: UserId) -> Result<AuthorView, Error> {
        let profile = self
            .users
            .find_profile(actor)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))?;
        Ok(AuthorView {
            profile,
            is_subscribed: false,
        })
    }
}

#[async_trait]
impl<U, L, R> SubscriptionsQuery for UsersService<U, L, R>
where
    U: UserRepository,
    L: LedgerRepository,
    R: RecipeRepository,
{
    async fn subscriptions(
        &self,
        actor: UserId,
        request: PageRequest,
        recipes_limit: Option<u32>,
    ) -> Result<Page<Subscription>, Error> {
        let page = self
            .ledger
            .followed_authors(actor, request)
            .await
            .map_err(map_ledger_error)?;
        let total = page.total();
        let mut items = Vec::with_capacity(page.items().len());
        for author in page.into_items() {
            items.push(self.with_recipes(author, true, recipes_limit).await?);
        }
        Ok(Page::new(items, total, request))
    }

    async fn subscription(
        &self,
        actor: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> Result<Subscription, Error> {
        let profile = self.find(author).await?;
        let is_subscribed = self.is_subscribed(Viewer::Authenticated(actor), author).await?;
        self.with_recipes(profile, is_subscribed, recipes_limit).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockLedgerRepository, MockRecipeRepository, MockUserRepository};
    use crate::domain::{CookingTime, ErrorCode, ImageRef, RecipeId, RecipeSummary};
    use rstest::rstest;

    type Service = UsersService<MockUserRepository, MockLedgerRepository, MockRecipeRepository>;

    fn make_service(
        users: MockUserRepository,
        ledger: MockLedgerRepository,
        recipes: MockRecipeRepository,
    ) -> Service {
        UsersService::new(Arc::new(users), Arc::new(ledger), Arc::new(recipes))
    }

    fn profile(id: i64) -> UserProfile {
        UserProfile {
            id: UserId::new(id),
            email: format!("user{id}@example.com"),
            username: format!("user{id}"),
            first_name: Some("Anna".to_owned()),
            last_name: Some("Petrova".to_owned()),
        }
    }

    fn summary(id: i64) -> RecipeSummary {
        RecipeSummary {
            id: RecipeId::new(id),
            name: format!("Recipe {id}"),
            image: ImageRef::new(format!("/media/recipes/{id}.png")),
            cooking_time: CookingTime::new(10).expect("valid minutes"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_profile_is_never_subscribed() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_profile()
            .times(1)
            .return_once(|id| Ok(Some(profile(id.get()))));
        let mut ledger = MockLedgerRepository::new();
        ledger.expect_exists().times(0);
        let service = make_service(users, ledger, MockRecipeRepository::new());

        let view = service
            .profile(Viewer::Anonymous, UserId::new(3))
            .await
            .expect("profile");
        assert!(!view.is_subscribed);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_profile().times(1).return_once(|_| Ok(None));
        let service = make_service(
            users,
            MockLedgerRepository::new(),
            MockRecipeRepository::new(),
        );

        let err = service
            .profile(Viewer::Anonymous, UserId::new(3))
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_marks_followed_users_and_skips_self() {
        let mut users = MockUserRepository::new();
        users.expect_list_profiles().times(1).return_once(|request| {
            Ok(Page::new(vec![profile(1), profile(2), profile(3)], 3, request))
        });
        let mut ledger = MockLedgerRepository::new();
        ledger
            .expect_existing_targets()
            .withf(|kind, actor, candidates| {
                *kind == RelationKind::Follow && *actor == UserId::new(1) && candidates.len() == 2
            })
            .times(1)
            .return_once(|_, _, _| {
                Ok(HashSet::from([RelationTarget::Author(UserId::new(3))]))
            });
        let service = make_service(users, ledger, MockRecipeRepository::new());

        let page = service
            .list_users(Viewer::Authenticated(UserId::new(1)), PageRequest::default())
            .await
            .expect("users");
        let flags: Vec<bool> = page.items().iter().map(|v| v.is_subscribed).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[rstest]
    #[tokio::test]
    async fn subscriptions_truncate_previews_but_not_counts() {
        let mut ledger = MockLedgerRepository::new();
        ledger
            .expect_followed_authors()
            .times(1)
            .return_once(|_, request| Ok(Page::new(vec![profile(2)], 1, request)));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_summaries_by_author()
            .withf(|author, limit| *author == UserId::new(2) && *limit == Some(1))
            .times(1)
            .return_once(|_, _| Ok(vec![summary(9)]));
        recipes
            .expect_count_by_author()
            .times(1)
            .return_once(|_| Ok(4));
        let service = make_service(MockUserRepository::new(), ledger, recipes);

        let page = service
            .subscriptions(UserId::new(1), PageRequest::default(), Some(1))
            .await
            .expect("subscriptions");
        let subscription = page.items().first().expect("one author");
        assert!(subscription.is_subscribed);
        assert_eq!(subscription.recipes, vec![summary(9)]);
        assert_eq!(subscription.recipes_count, 4);
        assert_eq!(page.total(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn me_for_vanished_user_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_profile().times(1).return_once(|_| Ok(None));
        let service = make_service(
            users,
            MockLedgerRepository::new(),
            MockRecipeRepository::new(),
        );

        let err = service.me(UserId::new(8)).await.expect_err("gone");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
