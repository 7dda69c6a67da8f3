//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories here implement the domain repository ports over
//! `diesel-async` connections drawn from a `bb8` pool. Row structs and the
//! schema stay private to this module; every database error is mapped to a
//! port error before it leaves.
//!
//! Updates are guarded by the row revision: a statement filters on both the
//! identifier and the expected revision, and zero affected rows is reported
//! as [`UpdateOutcome::Stale`](crate::domain::ports::UpdateOutcome).
//!
//! # Example
//!
//! ```no_run
//! use taskboard::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PoolConfig::new("postgres://localhost/taskboard");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

pub(crate) mod diesel_helpers;
mod diesel_store_health;
mod diesel_task_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_store_health::DieselStoreHealth;
pub use diesel_task_repository::DieselTaskRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
