//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Ownership checks and validation live in the services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: driver and pool failures are mapped onto
//!   each port's `Connection` or `Query` variant.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_auth_token_repository;
mod diesel_error_mapping;
mod diesel_label_repository;
mod diesel_recipe_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_auth_token_repository::DieselAuthTokenRepository;
pub use diesel_label_repository::DieselLabelRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
