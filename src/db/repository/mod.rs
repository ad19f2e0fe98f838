//! Repository trait definitions for storage operations.
//!
//! This module provides focused repository traits that abstract the storage
//! backend. By splitting responsibilities across traits, implementations can
//! stay focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`unit`]: CRUD operations for lodging units
//! - [`reservation`]: Validated reservation writes and lookups
//!
//! # Convenience Trait Bound
//!
//! For functions that need the full repository surface, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository>(repo: &R) -> RepositoryResult<()> {
//!     let unit = repo.get_unit(unit_id).await?;
//!     repo.create_reservation(&new_reservation).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod reservation;
pub mod unit;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use reservation::ReservationRepository;
pub use unit::UnitRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both repository
/// traits. Use this as a convenient bound when you need access to all
/// repository operations.
pub trait FullRepository: UnitRepository + ReservationRepository {}

// Blanket implementation: any type implementing both traits is a FullRepository
impl<T> FullRepository for T where T: UnitRepository + ReservationRepository {}
