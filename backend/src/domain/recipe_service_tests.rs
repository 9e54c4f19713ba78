//! Tests for the recipe service.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockCatalogRepository, MockImageStore, MockLedgerRepository, MockRecipeRepository,
};
use crate::domain::{
    Amount, CompositionInput, CompositionLine, CookingTime, ErrorCode, ImagePayload, ImageRef,
    Ingredient, Tag, TagId, UserProfile,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

type Service =
    RecipeService<MockRecipeRepository, MockCatalogRepository, MockLedgerRepository, MockImageStore>;

#[derive(Default)]
struct Mocks {
    recipes: MockRecipeRepository,
    catalog: MockCatalogRepository,
    ledger: MockLedgerRepository,
    images: MockImageStore,
}

impl Mocks {
    fn build(self) -> Service {
        RecipeService::new(RecipeServicePorts {
            recipes: Arc::new(self.recipes),
            catalog: Arc::new(self.catalog),
            ledger: Arc::new(self.ledger),
            images: Arc::new(self.images),
            clock: Arc::new(FixtureClock {
                utc_now: fixture_timestamp(),
            }),
        })
    }
}

const AUTHOR: UserId = UserId::new(1);
const READER: UserId = UserId::new(2);

fn ingredient(id: i64, name: &str) -> Ingredient {
    Ingredient {
        id: IngredientId::new(id),
        name: name.to_owned(),
        measurement_unit: "g".to_owned(),
    }
}

fn soup_tag() -> Tag {
    Tag {
        id: TagId::new(1),
        name: "суп".to_owned(),
        color: "#fff68f".to_owned(),
        slug: "soup".to_owned(),
    }
}

fn author_profile(id: UserId) -> UserProfile {
    UserProfile {
        id,
        email: format!("user{id}@example.com"),
        username: format!("user{id}"),
        first_name: Some("Ivan".to_owned()),
        last_name: None,
    }
}

fn stored_recipe(id: i64, author: UserId) -> Recipe {
    Recipe {
        id: RecipeId::new(id),
        author: Some(author_profile(author)),
        name: "Pancakes".to_owned(),
        image: ImageRef::new("/media/recipes/abc.png"),
        text: "Mix and fry.".to_owned(),
        cooking_time: CookingTime::new(20).expect("valid minutes"),
        tags: vec![soup_tag()],
        ingredients: vec![CompositionLine {
            ingredient: ingredient(1, "Flour"),
            amount: Amount::new(200.0).expect("positive"),
        }],
        pub_date: fixture_timestamp(),
    }
}

#[fixture]
fn draft() -> RecipeDraft {
    RecipeDraft {
        name: "Pancakes".to_owned(),
        text: "Mix and fry.".to_owned(),
        cooking_time: 20,
        ingredients: vec![
            CompositionInput {
                ingredient: IngredientId::new(1),
                amount: 200.0,
            },
            CompositionInput {
                ingredient: IngredientId::new(2),
                amount: 2.0,
            },
        ],
        tags: vec![TagId::new(1)],
        image: Some(ImagePayload::new("data:image/png;base64,iVBORw0KGgo=")),
    }
}

fn catalog_with(ingredients: Vec<Ingredient>, tags: Vec<Tag>) -> MockCatalogRepository {
    let mut catalog = MockCatalogRepository::new();
    catalog
        .expect_ingredients_by_ids()
        .return_once(move |_| Ok(ingredients));
    catalog.expect_tags_by_ids().return_once(move |_| Ok(tags));
    catalog
}

#[rstest]
#[tokio::test]
async fn create_rejects_zero_cooking_time_before_storage(mut draft: RecipeDraft) {
    draft.cooking_time = 0;
    let service = Mocks::default().build();

    let err = service.create(AUTHOR, draft).await.expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "cooking_time must be > 0");
}

#[rstest]
#[tokio::test]
async fn create_rejects_same_ingredient_under_two_ids(draft: RecipeDraft) {
    let service = Mocks {
        catalog: catalog_with(
            vec![ingredient(1, "Flour"), ingredient(2, "Flour")],
            vec![soup_tag()],
        ),
        ..Mocks::default()
    }
    .build();

    let err = service.create(AUTHOR, draft).await.expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.message(), "duplicate ingredient");
}

#[rstest]
#[tokio::test]
async fn create_reports_unknown_ingredient_as_not_found(draft: RecipeDraft) {
    let service = Mocks {
        catalog: catalog_with(vec![ingredient(1, "Flour")], vec![soup_tag()]),
        ..Mocks::default()
    }
    .build();

    let err = service.create(AUTHOR, draft).await.expect_err("unknown id");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(
        err.details().and_then(|d| d.get("ids")),
        Some(&serde_json::json!([2]))
    );
}

#[rstest]
#[tokio::test]
async fn create_requires_an_image(mut draft: RecipeDraft) {
    draft.image = None;
    let service = Mocks {
        catalog: catalog_with(
            vec![ingredient(1, "Flour"), ingredient(2, "Egg")],
            vec![soup_tag()],
        ),
        ..Mocks::default()
    }
    .build();

    let err = service.create(AUTHOR, draft).await.expect_err("no image");
    assert_eq!(err.message(), "image is required");
}

#[rstest]
#[tokio::test]
async fn create_persists_aggregate_and_returns_detail(draft: RecipeDraft) {
    let mut images = MockImageStore::new();
    images
        .expect_store()
        .times(1)
        .return_once(|_| Ok(ImageRef::new("/media/recipes/abc.png")));

    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_create()
        .withf(|recipe| {
            recipe.author == AUTHOR
                && recipe.pub_date == fixture_timestamp()
                && recipe.lines.len() == 2
                && recipe.tags == vec![TagId::new(1)]
                && recipe.image.as_str() == "/media/recipes/abc.png"
        })
        .times(1)
        .return_once(|_| Ok(RecipeId::new(5)));
    recipes
        .expect_find()
        .times(1)
        .return_once(|id| Ok(Some(stored_recipe(id.get(), AUTHOR))));

    let mut ledger = MockLedgerRepository::new();
    ledger.expect_exists().times(2).returning(|_| Ok(false));

    let service = Mocks {
        recipes,
        catalog: catalog_with(
            vec![ingredient(1, "Flour"), ingredient(2, "Egg")],
            vec![soup_tag()],
        ),
        ledger,
        images,
    }
    .build();

    let detail = service.create(AUTHOR, draft).await.expect("created");
    assert_eq!(detail.recipe.id, RecipeId::new(5));
    assert!(!detail.is_favourited);
    assert!(!detail.is_in_cart);
    assert_eq!(detail.author.map(|a| a.is_subscribed), Some(false));
}

#[rstest]
#[tokio::test]
async fn update_by_non_author_is_forbidden(draft: RecipeDraft) {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(|id| Ok(Some(stored_recipe(id.get(), AUTHOR))));
    recipes.expect_replace().times(0);
    let service = Mocks {
        recipes,
        ..Mocks::default()
    }
    .build();

    let err = service
        .update(READER, RecipeId::new(5), draft)
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_recipe_is_not_found(draft: RecipeDraft) {
    let mut recipes = MockRecipeRepository::new();
    recipes.expect_find().times(1).return_once(|_| Ok(None));
    let service = Mocks {
        recipes,
        ..Mocks::default()
    }
    .build();

    let err = service
        .update(AUTHOR, RecipeId::new(5), draft)
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_without_image_keeps_stored_image(mut draft: RecipeDraft) {
    draft.image = None;
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(2)
        .returning(|id| Ok(Some(stored_recipe(id.get(), AUTHOR))));
    recipes
        .expect_replace()
        .withf(|id, changes| *id == RecipeId::new(5) && changes.image.is_none())
        .times(1)
        .return_once(|_, _| Ok(true));
    let mut images = MockImageStore::new();
    images.expect_store().times(0);
    let mut ledger = MockLedgerRepository::new();
    ledger.expect_exists().returning(|_| Ok(true));

    let service = Mocks {
        recipes,
        catalog: catalog_with(
            vec![ingredient(1, "Flour"), ingredient(2, "Egg")],
            vec![soup_tag()],
        ),
        ledger,
        images,
    }
    .build();

    let detail = service
        .update(AUTHOR, RecipeId::new(5), draft)
        .await
        .expect("updated");
    assert!(detail.is_favourited);
    assert!(detail.is_in_cart);
}

#[rstest]
#[tokio::test]
async fn delete_by_author_removes_recipe() {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(|id| Ok(Some(stored_recipe(id.get(), AUTHOR))));
    recipes.expect_delete().times(1).return_once(|_| Ok(true));
    let service = Mocks {
        recipes,
        ..Mocks::default()
    }
    .build();

    service
        .delete(AUTHOR, RecipeId::new(5))
        .await
        .expect("deleted");
}

#[rstest]
#[tokio::test]
async fn anonymous_detail_never_touches_the_ledger() {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(|id| Ok(Some(stored_recipe(id.get(), AUTHOR))));
    let mut ledger = MockLedgerRepository::new();
    ledger.expect_exists().times(0);
    ledger.expect_existing_targets().times(0);
    let service = Mocks {
        recipes,
        ledger,
        ..Mocks::default()
    }
    .build();

    let detail = service
        .get(Viewer::Anonymous, RecipeId::new(5))
        .await
        .expect("detail");
    assert!(!detail.is_favourited);
    assert!(!detail.is_in_cart);
    assert_eq!(detail.author.map(|a| a.is_subscribed), Some(false));
}

#[rstest]
#[tokio::test]
async fn authenticated_detail_reports_subscription() {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_find()
        .times(1)
        .return_once(|id| Ok(Some(stored_recipe(id.get(), AUTHOR))));
    let mut ledger = MockLedgerRepository::new();
    ledger
        .expect_exists()
        .times(3)
        .returning(|relation| Ok(relation.kind() == RelationKind::Follow));
    let service = Mocks {
        recipes,
        ledger,
        ..Mocks::default()
    }
    .build();

    let detail = service
        .get(Viewer::Authenticated(READER), RecipeId::new(5))
        .await
        .expect("detail");
    assert!(!detail.is_favourited);
    assert_eq!(detail.author.map(|a| a.is_subscribed), Some(true));
}

#[rstest]
#[tokio::test]
async fn list_batches_flag_lookups_per_kind() {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_list()
        .withf(|filter, _| filter.favourited_by == Some(READER))
        .times(1)
        .return_once(|_, request| {
            Ok(Page::new(
                vec![stored_recipe(1, AUTHOR), stored_recipe(2, AUTHOR)],
                2,
                request,
            ))
        });
    let mut ledger = MockLedgerRepository::new();
    ledger.expect_exists().times(0);
    ledger
        .expect_existing_targets()
        .times(3)
        .returning(|kind, _, candidates| {
            let found: HashSet<RelationTarget> = match kind {
                RelationKind::Favourite => candidates.iter().copied().collect(),
                RelationKind::Cart => HashSet::from([RelationTarget::Recipe(RecipeId::new(2))]),
                RelationKind::Follow => HashSet::new(),
            };
            Ok(found)
        });
    let service = Mocks {
        recipes,
        ledger,
        ..Mocks::default()
    }
    .build();

    let query = RecipeListQuery {
        is_favorited: true,
        ..RecipeListQuery::default()
    };
    let page = service
        .list(
            Viewer::Authenticated(READER),
            &query,
            PageRequest::default(),
        )
        .await
        .expect("page");
    let flags: Vec<(bool, bool)> = page
        .items()
        .iter()
        .map(|detail| (detail.is_favourited, detail.is_in_cart))
        .collect();
    assert_eq!(flags, vec![(true, false), (true, true)]);
}

#[rstest]
#[tokio::test]
async fn anonymous_list_drops_viewer_filters() {
    let mut recipes = MockRecipeRepository::new();
    recipes
        .expect_list()
        .withf(|filter, _| filter.favourited_by.is_none() && filter.in_cart_of.is_none())
        .times(1)
        .return_once(|_, request| Ok(Page::empty(request)));
    let mut ledger = MockLedgerRepository::new();
    ledger.expect_existing_targets().times(0);
    let service = Mocks {
        recipes,
        ledger,
        ..Mocks::default()
    }
    .build();

    let query = RecipeListQuery {
        is_favorited: true,
        is_in_shopping_cart: true,
        ..RecipeListQuery::default()
    };
    let page = service
        .list(Viewer::Anonymous, &query, PageRequest::default())
        .await
        .expect("page");
    assert_eq!(page.total(), 0);
}
