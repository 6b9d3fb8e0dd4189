//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's driven ports backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Every database failure is mapped onto [`UserPersistenceError`].
//!
//! [`UserPersistenceError`]: crate::domain::ports::UserPersistenceError
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mockable::DefaultClock;
//! use users_api::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), users_api::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("host=localhost dbname=api_db")).await?;
//! let repo = DieselUserRepository::new(pool, Arc::new(DefaultClock));
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::{DEFAULT_STATEMENT_TIMEOUT, DieselUserRepository};
pub use migrations::{
    MIGRATIONS, MigrationError, run_pending_migrations, run_pending_migrations_blocking,
};
pub use pool::{DbPool, PoolConfig, PoolError};
