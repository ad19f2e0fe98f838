//! Repository trait for reservation operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewReservation, Reservation, ReservationId, UnitId};

/// Repository trait for reservation storage and retrieval.
///
/// # Write discipline
///
/// `create_reservation` and `update_reservation` MUST run the availability
/// engine's validation against the current stored state and perform the write
/// only if it passes, with the read-validate-write sequence treated as a
/// critical section for the affected unit (a lock held across the sequence,
/// or a serializable transaction). A reservation is never partially written;
/// implementations return [`super::RepositoryError::Validation`] on any
/// invariant violation. This holds for every entry point, including direct
/// data-layer callers that bypass the HTTP API.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Validate and store a new reservation.
    ///
    /// # Returns
    /// * `Ok(Reservation)` - The stored reservation with its assigned id
    /// * `Err(RepositoryError::Validation)` - If an invariant is violated
    /// * `Err(RepositoryError::NotFound)` - If the unit doesn't exist
    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation>;

    /// Re-validate and update an existing reservation.
    ///
    /// The overlap check excludes the reservation's own id, so an edit that
    /// overlaps only the reservation's prior stored range is accepted.
    ///
    /// # Returns
    /// * `Ok(Reservation)` - The updated reservation
    /// * `Err(RepositoryError::Validation)` - If an invariant is violated
    /// * `Err(RepositoryError::NotFound)` - If the reservation or target
    ///   unit doesn't exist
    async fn update_reservation(
        &self,
        reservation_id: ReservationId,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation>;

    /// Retrieve a reservation by id.
    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> RepositoryResult<Reservation>;

    /// List all reservations, ordered by check-in date ascending.
    async fn list_reservations(&self) -> RepositoryResult<Vec<Reservation>>;

    /// List the reservations for one unit, ordered by check-in date
    /// ascending, optionally excluding one reservation id.
    ///
    /// This is the lookup capability the availability engine consumes; the
    /// exclusion supports re-validating a reservation being edited.
    async fn reservations_for_unit(
        &self,
        unit_id: UnitId,
        exclude: Option<ReservationId>,
    ) -> RepositoryResult<Vec<Reservation>>;

    /// Delete a reservation.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(RepositoryError::NotFound)` - If the reservation doesn't exist
    async fn delete_reservation(&self, reservation_id: ReservationId) -> RepositoryResult<()>;
}
