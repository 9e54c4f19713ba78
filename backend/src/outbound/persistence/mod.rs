//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Ownership, validation and projection rules live in the
//!   domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Constraint-backed invariants**: duplicate relations and dangling
//!   references are rejected by the database and classified in
//!   `diesel_error_mapping.rs`.
//!
//! # Example
//!
//! ```ignore
//! use foodgram::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_catalog_ingestion_repository;
mod diesel_catalog_repository;
mod diesel_error_mapping;
mod diesel_ledger_repository;
mod diesel_recipe_repository;
mod diesel_shopping_cart_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalog_ingestion_repository::DieselCatalogIngestionRepository;
pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_ledger_repository::DieselLedgerRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_shopping_cart_repository::DieselShoppingCartRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
