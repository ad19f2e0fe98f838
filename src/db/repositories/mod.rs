//! Repository implementations.
//!
//! - [`local`]: In-memory implementation for unit testing and local
//!   development (feature `local-repo`, default).
//! - [`postgres`]: PostgreSQL implementation with Diesel ORM
//!   (feature `postgres-repo`).

pub mod local;

#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;

#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
