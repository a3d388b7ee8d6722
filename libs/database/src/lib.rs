//! PostgreSQL connectivity for the store backend.
//!
//! Provides SeaORM connection management with retry, migration running,
//! health checks, and a thin generic repository base used by the domain
//! crates.
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config(config).await?;
//! postgres::run_migrations::<Migrator>(&db, "store_api").await?;
//! ```

pub mod common;
pub mod postgres;
pub mod repository;

pub use common::{DatabaseError, DatabaseResult};
pub use repository::BaseRepository;
