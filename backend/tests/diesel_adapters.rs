//! Recipe, ledger and shopping-cart adapters against a real PostgreSQL
//! database.
//!
//! Set `FOODGRAM_TEST_DATABASE_URL` to run these tests; without it they
//! return early. Every test names its rows with a fresh suffix, so runs
//! against the same database do not interfere.

use std::env;
use std::sync::Arc;

use chrono::Utc;
use diesel::QueryableByName;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;
use foodgram::domain::ports::{
    CatalogRepository, LedgerCommand, LedgerRepository, LedgerRepositoryError, RecipeRepository,
    ShoppingCartQuery, ShoppingCartRepository,
};
use foodgram::domain::{
    Amount, CatalogIngestionService, CookingTime, ErrorCode, ImageRef, IngredientId,
    IngredientSearch, LedgerService, LineSpec, NewIngredient, NewRecipe, NewTag, RecipeChanges,
    RecipeId, Relation, ShoppingCartService, ShoppingListLayout, TagId, UserId,
};
use foodgram::outbound::persistence::{
    DbPool, DieselCatalogIngestionRepository, DieselCatalogRepository, DieselLedgerRepository,
    DieselRecipeRepository, DieselShoppingCartRepository, DieselUserRepository, PoolConfig,
    run_migrations,
};
use rstest::rstest;
use uuid::Uuid;

const DATABASE_URL_ENV: &str = "FOODGRAM_TEST_DATABASE_URL";

#[derive(QueryableByName)]
struct InsertedId {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

/// Rows created for one test, all named with the same suffix.
struct Seed {
    pool: DbPool,
    suffix: String,
}

impl Seed {
    async fn open() -> Option<Self> {
        let Ok(url) = env::var(DATABASE_URL_ENV) else {
            eprintln!("{DATABASE_URL_ENV} unset; skipping database test");
            return None;
        };
        run_migrations(&url).await.expect("migrations apply");
        let pool = DbPool::new(PoolConfig::new(url)).await.expect("database pool");
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_owned();
        Some(Self { pool, suffix })
    }

    fn name(&self, base: &str) -> String {
        format!("{base} {}", self.suffix)
    }

    async fn user(&self, handle: &str) -> UserId {
        let handle = format!("{handle}_{}", self.suffix);
        let mut conn = self.pool.get().await.expect("connection");
        let row: InsertedId = diesel::sql_query(
            "INSERT INTO users (email, username) VALUES ($1, $2) RETURNING id",
        )
        .bind::<Text, _>(format!("{handle}@example.com"))
        .bind::<Text, _>(handle.as_str())
        .get_result(&mut conn)
        .await
        .expect("insert user");
        UserId::new(row.id)
    }

    /// Load `(name, unit)` pairs and return their ids in the same order.
    async fn ingredients(&self, wanted: &[(&str, &str)]) -> Vec<IngredientId> {
        let rows: Vec<NewIngredient> = wanted
            .iter()
            .map(|(name, unit)| NewIngredient {
                name: self.name(name),
                measurement_unit: (*unit).to_owned(),
            })
            .collect();
        CatalogIngestionService::load(
            &CatalogIngestionService::new(Arc::new(DieselCatalogIngestionRepository::new(
                self.pool.clone(),
            ))),
            &rows, &[],
        )
        .await
        .expect("load ingredients");

        let catalog = DieselCatalogRepository::new(self.pool.clone());
        let mut ids = Vec::with_capacity(rows.len());
        for row in &rows {
            let found = catalog
                .list_ingredients(&IngredientSearch::new(Some(row.name.as_str())))
                .await
                .expect("search ingredients");
            let ingredient = found
                .into_iter()
                .find(|candidate| {
                    candidate.name == row.name && candidate.measurement_unit == row.measurement_unit
                })
                .expect("loaded ingredient");
            ids.push(ingredient.id);
        }
        ids
    }

    async fn tags(&self, slugs: &[&str]) -> Vec<TagId> {
        let rows: Vec<NewTag> = slugs
            .iter()
            .map(|slug| NewTag {
                name: self.name(slug),
                color: "#a0db8e".to_owned(),
                slug: format!("{slug}-{}", self.suffix),
            })
            .collect();
        CatalogIngestionService::load(
            &CatalogIngestionService::new(Arc::new(DieselCatalogIngestionRepository::new(
                self.pool.clone(),
            ))),
            &[], &rows,
        )
        .await
        .expect("load tags");

        let stored = DieselCatalogRepository::new(self.pool.clone())
            .list_tags()
            .await
            .expect("list tags");
        rows.iter()
            .map(|row| {
                stored
                    .iter()
                    .find(|tag| tag.slug == row.slug)
                    .map(|tag| tag.id)
                    .expect("loaded tag")
            })
            .collect()
    }

    async fn recipe(&self, author: UserId, lines: Vec<LineSpec>) -> RecipeId {
        DieselRecipeRepository::new(self.pool.clone())
            .create(&NewRecipe {
                author,
                name: self.name("recipe"),
                text: "mix and bake".to_owned(),
                cooking_time: CookingTime::new(30).expect("cooking time"),
                image: ImageRef::new("/media/recipes/cake.png"),
                lines,
                tags: Vec::new(),
                pub_date: Utc::now(),
            })
            .await
            .expect("create recipe")
    }
}

fn line(ingredient: IngredientId, amount: f64) -> LineSpec {
    LineSpec {
        ingredient,
        amount: Amount::new(amount).expect("positive amount"),
    }
}

#[rstest]
#[tokio::test]
async fn replace_swaps_the_whole_composition_and_tag_set() {
    let Some(seed) = Seed::open().await else {
        return;
    };
    let author = seed.user("author").await;
    let ids = seed
        .ingredients(&[("Flour", "g"), ("Sugar", "g"), ("Egg", "pcs")])
        .await;
    let tags = seed.tags(&["breakfast", "dessert"]).await;
    let (flour, sugar, egg) = (ids[0], ids[1], ids[2]);
    let repo = DieselRecipeRepository::new(seed.pool.clone());

    let id = repo
        .create(&NewRecipe {
            author,
            name: seed.name("pancakes"),
            text: "whisk".to_owned(),
            cooking_time: CookingTime::new(20).expect("cooking time"),
            image: ImageRef::new("/media/recipes/pancakes.png"),
            lines: vec![line(flour, 200.0), line(sugar, 50.0)],
            tags: vec![tags[0]],
            pub_date: Utc::now(),
        })
        .await
        .expect("create");

    let replaced = repo
        .replace(
            id,
            &RecipeChanges {
                name: seed.name("crepes"),
                text: "whisk thinner".to_owned(),
                cooking_time: CookingTime::new(25).expect("cooking time"),
                image: None,
                lines: vec![line(egg, 3.0), line(flour, 120.5)],
                tags: vec![tags[1]],
            },
        )
        .await
        .expect("replace");
    assert!(replaced);

    let stored = repo.find(id).await.expect("find").expect("recipe exists");
    let composition: Vec<(IngredientId, f64)> = stored
        .ingredients
        .iter()
        .map(|entry| (entry.ingredient.id, entry.amount.value()))
        .collect();
    assert_eq!(composition, vec![(egg, 3.0), (flour, 120.5)]);
    let tag_ids: Vec<TagId> = stored.tags.iter().map(|tag| tag.id).collect();
    assert_eq!(tag_ids, vec![tags[1]]);
    assert_eq!(stored.name, seed.name("crepes"));
    assert_eq!(stored.cooking_time.minutes(), 25);
    assert_eq!(stored.image.as_str(), "/media/recipes/pancakes.png");
}

#[rstest]
#[tokio::test]
async fn replacing_a_missing_recipe_reports_false() {
    let Some(seed) = Seed::open().await else {
        return;
    };
    let repo = DieselRecipeRepository::new(seed.pool.clone());
    let replaced = repo
        .replace(
            RecipeId::new(i64::MAX),
            &RecipeChanges {
                name: "ghost".to_owned(),
                text: "nothing".to_owned(),
                cooking_time: CookingTime::new(1).expect("cooking time"),
                image: None,
                lines: Vec::new(),
                tags: Vec::new(),
            },
        )
        .await
        .expect("replace");
    assert!(!replaced);
}

#[rstest]
#[tokio::test]
async fn second_insert_of_any_relation_is_a_duplicate() {
    let Some(seed) = Seed::open().await else {
        return;
    };
    let reader = seed.user("reader").await;
    let author = seed.user("author").await;
    let flour = seed.ingredients(&[("Flour", "g")]).await[0];
    let recipe = seed.recipe(author, vec![line(flour, 100.0)]).await;
    let ledger = DieselLedgerRepository::new(seed.pool.clone());

    for relation in [
        Relation::favourite(reader, recipe),
        Relation::cart(reader, recipe),
        Relation::follow(reader, author),
    ] {
        ledger.insert(&relation).await.expect("first insert");
        let second = ledger.insert(&relation).await;
        assert!(
            matches!(second, Err(LedgerRepositoryError::Duplicate { .. })),
            "{relation:?}: {second:?}"
        );
        assert!(ledger.exists(&relation).await.expect("exists"));
        assert!(ledger.delete(&relation).await.expect("delete"));
        assert!(!ledger.delete(&relation).await.expect("second delete"));
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_favourite_surfaces_as_conflict() {
    let Some(seed) = Seed::open().await else {
        return;
    };
    let reader = seed.user("reader").await;
    let author = seed.user("author").await;
    let flour = seed.ingredients(&[("Flour", "g")]).await[0];
    let recipe = seed.recipe(author, vec![line(flour, 100.0)]).await;
    let service = LedgerService::new(
        Arc::new(DieselLedgerRepository::new(seed.pool.clone())),
        Arc::new(DieselRecipeRepository::new(seed.pool.clone())),
        Arc::new(DieselUserRepository::new(seed.pool.clone())),
    );

    let relation = Relation::favourite(reader, recipe);
    service.add(relation).await.expect("first favourite");
    let err = service.add(relation).await.expect_err("second favourite");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn cart_of_two_recipes_exports_summed_lines() {
    let Some(seed) = Seed::open().await else {
        return;
    };
    let cook = seed.user("cook").await;
    let ids = seed
        .ingredients(&[("Flour", "g"), ("Sugar", "g"), ("Egg", "pcs")])
        .await;
    let (flour, sugar, egg) = (ids[0], ids[1], ids[2]);
    let recipe_a = seed
        .recipe(cook, vec![line(flour, 200.0), line(sugar, 50.0)])
        .await;
    let recipe_b = seed
        .recipe(cook, vec![line(flour, 100.0), line(egg, 2.0)])
        .await;

    let ledger = DieselLedgerRepository::new(seed.pool.clone());
    for recipe in [recipe_a, recipe_b] {
        ledger
            .insert(&Relation::cart(cook, recipe))
            .await
            .expect("add to cart");
    }

    let cart = Arc::new(DieselShoppingCartRepository::new(seed.pool.clone()));
    let mut in_cart = cart.cart_recipe_ids(cook).await.expect("cart ids");
    in_cart.sort();
    let mut expected_ids = vec![recipe_a, recipe_b];
    expected_ids.sort();
    assert_eq!(in_cart, expected_ids);
    assert_eq!(
        cart.composition_lines(&in_cart).await.expect("lines").len(),
        4
    );

    let document = ShoppingCartService::new(cart, ShoppingListLayout::LinePerEntry)
        .export(cook)
        .await
        .expect("export");
    assert_eq!(document.filename, "listbuy.txt");
    assert_eq!(
        document.body,
        format!(
            "Список продуктов:\n{} 2 pcs\n{} 300 g\n{} 50 g\n",
            seed.name("Egg"),
            seed.name("Flour"),
            seed.name("Sugar"),
        )
    );
}
