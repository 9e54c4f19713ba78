//! Load ingredient and tag reference data into the Foodgram database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use camino::Utf8PathBuf;
use catalog_data::CatalogBundle;
use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use foodgram::domain::{CatalogIngestionService, NewIngredient, NewTag};
use foodgram::outbound::persistence::{
    DbPool, DieselCatalogIngestionRepository, PoolConfig, run_migrations,
};
use tracing::info;

/// `load-catalog` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "load-catalog",
    about = "Load ingredients and tags from a catalog bundle with get-or-create semantics",
    version
)]
struct CliArgs {
    /// Path to a catalog bundle JSON file.
    #[arg(
        long = "bundle",
        value_name = "path",
        default_value = "fixtures/catalog/catalog.json"
    )]
    bundle: Utf8PathBuf,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse();
    let bundle = CatalogBundle::from_file(&args.bundle)
        .wrap_err_with(|| format!("load catalog bundle {}", args.bundle))?;
    let (ingredients, tags) = domain_rows(&bundle);

    let database_url = resolve_database_url(args.database_url)?;
    let applied = run_migrations(&database_url)
        .await
        .wrap_err("apply database migrations")?;
    info!(applied, "migrations applied");

    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .wrap_err("create database pool")?;
    let service = CatalogIngestionService::new(Arc::new(DieselCatalogIngestionRepository::new(
        pool,
    )));
    let summary = service
        .load(&ingredients, &tags)
        .await
        .map_err(|error| eyre!("catalog load failed: {error}"))?;

    info!(
        bundle = %args.bundle,
        ingredients_inserted = summary.ingredients_inserted,
        tags_inserted = summary.tags_inserted,
        "catalog bundle applied"
    );
    Ok(())
}

fn domain_rows(bundle: &CatalogBundle) -> (Vec<NewIngredient>, Vec<NewTag>) {
    let ingredients = bundle
        .ingredients()
        .iter()
        .map(|seed| NewIngredient {
            name: seed.name.clone(),
            measurement_unit: seed.measurement_unit.clone(),
        })
        .collect();
    let tags = bundle
        .tags()
        .iter()
        .map(|seed| NewTag {
            name: seed.name.clone(),
            color: seed.color.clone(),
            slug: seed.slug.clone(),
        })
        .collect();
    (ingredients, tags)
}

fn resolve_database_url(explicit: Option<String>) -> color_eyre::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    let from_env = env::var("DATABASE_URL")
        .map_err(|_| eyre!("database URL missing: set --database-url or DATABASE_URL"))?;
    if from_env.trim().is_empty() {
        return Err(eyre!("DATABASE_URL must not be empty"));
    }
    Ok(from_env)
}
