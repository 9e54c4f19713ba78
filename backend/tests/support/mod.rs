//! Shared helpers for backend integration tests.
//!
//! [`InMemoryStore`] implements every repository port over one mutex-guarded
//! state so the real domain services and HTTP handlers can be exercised end
//! to end without PostgreSQL. [`spawn_app`] wires it the same way the server
//! wires the Diesel adapters.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, HttpResponse, test as actix_test, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use pagination::{Page, PageRequest};

use foodgram::domain::ports::{
    CatalogRepository, CatalogRepositoryError, FixtureImageStore, LedgerRepository,
    LedgerRepositoryError, RecipeRepository, RecipeRepositoryError, ShoppingCartRepository,
    ShoppingCartRepositoryError, UserRepository, UserRepositoryError,
};
use foodgram::domain::{
    CartLine, CatalogService, CompositionLine, CookingTime, ImageRef, Ingredient, IngredientId,
    IngredientSearch, LedgerService, LineSpec, NewRecipe, Recipe, RecipeChanges, RecipeFilter,
    RecipeId, RecipeService, RecipeServicePorts, RecipeSummary, Relation, RelationKind,
    RelationTarget, ShoppingCartService, ShoppingListLayout, Tag, TagId, UserId, UserProfile,
    UsersService,
};
use foodgram::inbound::http::session::SessionContext;
use foodgram::inbound::http::state::{HttpState, HttpStatePorts};
use foodgram::inbound::http::{ApiResult, configure_api, json_config};

/// Cookie name used by the test session middleware.
pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone)]
struct StoredRecipe {
    author: UserId,
    name: String,
    text: String,
    cooking_time: CookingTime,
    image: ImageRef,
    lines: Vec<LineSpec>,
    tags: Vec<TagId>,
    pub_date: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    users: Vec<UserProfile>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: BTreeMap<i64, StoredRecipe>,
    relations: Vec<Relation>,
    next_recipe_id: i64,
}

impl State {
    fn profile(&self, id: UserId) -> Option<UserProfile> {
        self.users.iter().find(|user| user.id == id).cloned()
    }

    fn hydrate(&self, id: i64, stored: &StoredRecipe) -> Recipe {
        let tags = self
            .tags
            .iter()
            .filter(|tag| stored.tags.contains(&tag.id))
            .cloned()
            .collect();
        let ingredients = stored
            .lines
            .iter()
            .filter_map(|line| {
                self.ingredients
                    .iter()
                    .find(|ingredient| ingredient.id == line.ingredient)
                    .map(|ingredient| CompositionLine {
                        ingredient: ingredient.clone(),
                        amount: line.amount,
                    })
            })
            .collect();
        Recipe {
            id: RecipeId::new(id),
            author: self.profile(stored.author),
            name: stored.name.clone(),
            image: stored.image.clone(),
            text: stored.text.clone(),
            cooking_time: stored.cooking_time,
            tags,
            ingredients,
            pub_date: stored.pub_date,
        }
    }

    fn has_relation(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }

    fn matches(&self, id: i64, stored: &StoredRecipe, filter: &RecipeFilter) -> bool {
        let recipe = RecipeId::new(id);
        let author_ok = filter.author.is_none_or(|author| author == stored.author);
        let tags_ok = filter.tags.is_empty()
            || self
                .tags
                .iter()
                .any(|tag| stored.tags.contains(&tag.id) && filter.tags.contains(&tag.slug));
        let favourite_ok = filter
            .favourited_by
            .is_none_or(|actor| self.has_relation(Relation::favourite(actor, recipe)));
        let cart_ok = filter
            .in_cart_of
            .is_none_or(|actor| self.has_relation(Relation::cart(actor, recipe)));
        author_ok && tags_ok && favourite_ok && cart_ok
    }

    /// Recipe ids newest first, ties broken by the larger id.
    fn newest_first(&self) -> Vec<(i64, &StoredRecipe)> {
        let mut ordered: Vec<(i64, &StoredRecipe)> = self
            .recipes
            .iter()
            .map(|(id, stored)| (*id, stored))
            .collect();
        ordered.sort_by(|(left_id, left), (right_id, right)| {
            right
                .pub_date
                .cmp(&left.pub_date)
                .then(right_id.cmp(left_id))
        });
        ordered
    }
}

fn page_of<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let slice = items.iter().skip(offset).take(limit).cloned().collect();
    Page::new(slice, total, request)
}

/// In-memory implementation of every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a user as the identity provider would.
    pub fn add_user(&self, id: i64, username: &str) -> UserId {
        let user = UserId::new(id);
        self.lock().users.push(UserProfile {
            id: user,
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: Some(username.to_uppercase()),
            last_name: None,
        });
        user
    }

    pub fn add_tag(&self, id: i64, name: &str, slug: &str) -> TagId {
        let tag = TagId::new(id);
        self.lock().tags.push(Tag {
            id: tag,
            name: name.to_owned(),
            color: "#a0db8e".to_owned(),
            slug: slug.to_owned(),
        });
        tag
    }

    pub fn add_ingredient(&self, id: i64, name: &str, unit: &str) -> IngredientId {
        let ingredient = IngredientId::new(id);
        self.lock().ingredients.push(Ingredient {
            id: ingredient,
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
        });
        ingredient
    }

    /// Number of stored relations of `kind`.
    pub fn relation_count(&self, kind: RelationKind) -> usize {
        self.lock()
            .relations
            .iter()
            .filter(|relation| relation.kind() == kind)
            .count()
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(&self, recipe: &NewRecipe) -> Result<RecipeId, RecipeRepositoryError> {
        let mut state = self.lock();
        state.next_recipe_id += 1;
        let id = state.next_recipe_id;
        state.recipes.insert(
            id,
            StoredRecipe {
                author: recipe.author,
                name: recipe.name.clone(),
                text: recipe.text.clone(),
                cooking_time: recipe.cooking_time,
                image: recipe.image.clone(),
                lines: recipe.lines.clone(),
                tags: recipe.tags.clone(),
                pub_date: recipe.pub_date,
            },
        );
        Ok(RecipeId::new(id))
    }

    async fn replace(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock();
        let Some(stored) = state.recipes.get_mut(&id.get()) else {
            return Ok(false);
        };
        stored.name.clone_from(&changes.name);
        stored.text.clone_from(&changes.text);
        stored.cooking_time = changes.cooking_time;
        if let Some(image) = &changes.image {
            stored.image = image.clone();
        }
        stored.lines.clone_from(&changes.lines);
        stored.tags.clone_from(&changes.tags);
        Ok(true)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock();
        let removed = state.recipes.remove(&id.get()).is_some();
        state
            .relations
            .retain(|relation| relation.target() != RelationTarget::Recipe(id));
        Ok(removed)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock();
        Ok(state
            .recipes
            .get(&id.get())
            .map(|stored| state.hydrate(id.get(), stored)))
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipeRepositoryError> {
        let state = self.lock();
        Ok(state
            .recipes
            .get(&id.get())
            .map(|stored| state.hydrate(id.get(), stored).summary()))
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        request: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let state = self.lock();
        let matching: Vec<Recipe> = state
            .newest_first()
            .into_iter()
            .filter(|(id, stored)| state.matches(*id, stored, filter))
            .map(|(id, stored)| state.hydrate(id, stored))
            .collect();
        Ok(page_of(&matching, request))
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let state = self.lock();
        let take = limit.map_or(usize::MAX, |value| {
            usize::try_from(value).unwrap_or(usize::MAX)
        });
        Ok(state
            .newest_first()
            .into_iter()
            .filter(|(_, stored)| stored.author == author)
            .take(take)
            .map(|(id, stored)| state.hydrate(id, stored).summary())
            .collect())
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let state = self.lock();
        Ok(state
            .recipes
            .values()
            .filter(|stored| stored.author == author)
            .count() as u64)
    }
}

#[async_trait]
impl LedgerRepository for InMemoryStore {
    async fn insert(&self, relation: &Relation) -> Result<(), LedgerRepositoryError> {
        let mut state = self.lock();
        if state.has_relation(*relation) {
            return Err(LedgerRepositoryError::duplicate(relation.kind().as_str()));
        }
        state.relations.push(*relation);
        Ok(())
    }

    async fn delete(&self, relation: &Relation) -> Result<bool, LedgerRepositoryError> {
        let mut state = self.lock();
        let before = state.relations.len();
        state.relations.retain(|stored| stored != relation);
        Ok(state.relations.len() != before)
    }

    async fn exists(&self, relation: &Relation) -> Result<bool, LedgerRepositoryError> {
        Ok(self.lock().has_relation(*relation))
    }

    async fn existing_targets(
        &self,
        kind: RelationKind,
        actor: UserId,
        candidates: &[RelationTarget],
    ) -> Result<HashSet<RelationTarget>, LedgerRepositoryError> {
        Ok(self
            .lock()
            .relations
            .iter()
            .filter(|relation| relation.kind() == kind && relation.actor() == actor)
            .map(Relation::target)
            .filter(|target| candidates.contains(target))
            .collect())
    }

    async fn followed_authors(
        &self,
        actor: UserId,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, LedgerRepositoryError> {
        let state = self.lock();
        let mut authors: Vec<UserProfile> = state
            .relations
            .iter()
            .filter(|relation| {
                relation.kind() == RelationKind::Follow && relation.actor() == actor
            })
            .filter_map(|relation| match relation.target() {
                RelationTarget::Author(author) => state.profile(author),
                RelationTarget::Recipe(_) => None,
            })
            .collect();
        authors.sort_by_key(|profile| profile.id);
        Ok(page_of(&authors, request))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_profile(&self, id: UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        Ok(self.lock().profile(id))
    }

    async fn list_profiles(
        &self,
        request: PageRequest,
    ) -> Result<Page<UserProfile>, UserRepositoryError> {
        let mut users = self.lock().users.clone();
        users.sort_by_key(|profile| profile.id);
        Ok(page_of(&users, request))
    }
}

#[async_trait]
impl CatalogRepository for InMemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogRepositoryError> {
        Ok(self.lock().tags.clone())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogRepositoryError> {
        Ok(self.lock().tags.iter().find(|tag| tag.id == id).cloned())
    }

    async fn tags_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>, CatalogRepositoryError> {
        Ok(self
            .lock()
            .tags
            .iter()
            .filter(|tag| ids.contains(&tag.id))
            .cloned()
            .collect())
    }

    async fn list_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError> {
        let mut matching: Vec<Ingredient> = self
            .lock()
            .ingredients
            .iter()
            .filter(|ingredient| search.matches(ingredient))
            .cloned()
            .collect();
        matching.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        Ok(matching)
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogRepositoryError> {
        Ok(self
            .lock()
            .ingredients
            .iter()
            .find(|ingredient| ingredient.id == id)
            .cloned())
    }

    async fn ingredients_by_ids(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, CatalogRepositoryError> {
        Ok(self
            .lock()
            .ingredients
            .iter()
            .filter(|ingredient| ids.contains(&ingredient.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ShoppingCartRepository for InMemoryStore {
    async fn cart_recipe_ids(
        &self,
        actor: UserId,
    ) -> Result<Vec<RecipeId>, ShoppingCartRepositoryError> {
        Ok(self
            .lock()
            .relations
            .iter()
            .filter(|relation| relation.kind() == RelationKind::Cart && relation.actor() == actor)
            .filter_map(|relation| match relation.target() {
                RelationTarget::Recipe(recipe) => Some(recipe),
                RelationTarget::Author(_) => None,
            })
            .collect())
    }

    async fn composition_lines(
        &self,
        recipes: &[RecipeId],
    ) -> Result<Vec<CartLine>, ShoppingCartRepositoryError> {
        let state = self.lock();
        Ok(recipes
            .iter()
            .filter_map(|id| state.recipes.get(&id.get()).map(|stored| (*id, stored)))
            .flat_map(|(id, stored)| state.hydrate(id.get(), stored).ingredients)
            .map(|line| CartLine {
                name: line.ingredient.name,
                measurement_unit: line.ingredient.measurement_unit,
                amount: line.amount.value(),
            })
            .collect())
    }
}

/// Build handler state over `store` with the production service wiring.
pub fn http_state(store: &Arc<InMemoryStore>, layout: ShoppingListLayout) -> HttpState {
    let recipes = Arc::new(RecipeService::new(RecipeServicePorts {
        recipes: store.clone(),
        catalog: store.clone(),
        ledger: store.clone(),
        images: Arc::new(FixtureImageStore),
        clock: Arc::new(DefaultClock),
    }));
    let users = Arc::new(UsersService::new(store.clone(), store.clone(), store.clone()));
    let ports = HttpStatePorts {
        catalog: Arc::new(CatalogService::new(store.clone())),
        recipes: recipes.clone(),
        recipes_query: recipes,
        ledger: Arc::new(LedgerService::new(store.clone(), store.clone(), store.clone())),
        shopping_cart: Arc::new(ShoppingCartService::new(store.clone(), layout)),
        users: users.clone(),
        subscriptions: users,
    };
    HttpState::new(ports, 6)
}

async fn sign_in(session: SessionContext, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    session.persist_user(UserId::new(path.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Build the `/api` application over `store` with a sign-in route standing
/// in for the identity provider.
pub fn app(
    store: &Arc<InMemoryStore>,
    layout: ShoppingListLayout,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(web::Data::new(http_state(store, layout)))
        .app_data(json_config())
        .wrap(session)
        .route("/test/sign-in/{id}", web::post().to(sign_in))
        .service(web::scope("/api").configure(configure_api))
}

/// Sign `user` in and return the issued session cookie.
pub async fn sign_in_as<S>(app: &S, user: UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri(&format!("/test/sign-in/{user}"))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "sign-in failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .expect("session cookie")
        .into_owned()
}
