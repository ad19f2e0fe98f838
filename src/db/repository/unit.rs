//! Repository trait for lodging unit operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewUnit, Unit, UnitId};

/// Repository trait for unit CRUD operations.
///
/// Units carry no overlap logic themselves; they are created and edited via
/// administrative input. Deleting a unit deletes its reservations (cascading
/// ownership).
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait UnitRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a new unit and assign it an id.
    async fn create_unit(&self, unit: &NewUnit) -> RepositoryResult<Unit>;

    /// Retrieve a unit by id.
    ///
    /// # Returns
    /// * `Ok(Unit)` - The unit
    /// * `Err(RepositoryError::NotFound)` - If the unit doesn't exist
    async fn get_unit(&self, unit_id: UnitId) -> RepositoryResult<Unit>;

    /// List all units.
    async fn list_units(&self) -> RepositoryResult<Vec<Unit>>;

    /// Delete a unit and all of its reservations.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(RepositoryError::NotFound)` - If the unit doesn't exist
    async fn delete_unit(&self, unit_id: UnitId) -> RepositoryResult<()>;
}
