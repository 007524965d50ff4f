//! User store adapters: PostgreSQL via `diesel-async` and `bb8` connection
//! pooling, plus an in-memory table for tests and database-less runs.
//!
//! - **Thin adapter**: the repository only translates between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Constraint-driven uniqueness**: unique violations are classified by
//!   constraint name into `UniqueUserColumn`s.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/instaclone")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_user_repository;
mod in_memory_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod user_persistence_error_mapping;

pub use diesel_user_repository::DieselUserRepository;
pub use in_memory_user_repository::InMemoryUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
