//! High-level database service layer.
//!
//! Repository-agnostic operations that work with any implementation of the
//! repository traits. The HTTP handlers call these functions rather than the
//! repository directly, so cross-cutting behavior (logging, availability
//! queries) stays consistent regardless of the storage backend.
//!
//! Reservation writes are validated by the repository itself inside its
//! critical section; the read-only availability queries here call the same
//! engine, so there is exactly one implementation of the booking rules.

use chrono::NaiveDate;
use log::info;

use super::repository::{FullRepository, RepositoryResult};
use crate::models::{
    BookedPeriod, NewReservation, NewUnit, Reservation, ReservationId, Unit, UnitId,
};
use crate::services::availability;

// ==================== Health & Connection ====================

/// Check if the storage backend is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Unit Operations ====================

/// Create a new lodging unit.
pub async fn create_unit<R: FullRepository + ?Sized>(
    repo: &R,
    unit: &NewUnit,
) -> RepositoryResult<Unit> {
    let stored = repo.create_unit(unit).await?;
    info!(
        "Service layer: created unit '{}' (id={}, capacity={})",
        stored.name, stored.id, stored.capacity
    );
    Ok(stored)
}

/// Retrieve a unit by id.
pub async fn get_unit<R: FullRepository + ?Sized>(
    repo: &R,
    unit_id: UnitId,
) -> RepositoryResult<Unit> {
    repo.get_unit(unit_id).await
}

/// List all units.
pub async fn list_units<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Unit>> {
    repo.list_units().await
}

/// Delete a unit and its reservations.
pub async fn delete_unit<R: FullRepository + ?Sized>(
    repo: &R,
    unit_id: UnitId,
) -> RepositoryResult<()> {
    repo.delete_unit(unit_id).await?;
    info!("Service layer: deleted unit {} and its reservations", unit_id);
    Ok(())
}

// ==================== Reservation Operations ====================

/// Validate and store a new reservation.
///
/// Validation happens inside the repository's critical section; a
/// `RepositoryError::Validation` result means nothing was written.
pub async fn create_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation: &NewReservation,
) -> RepositoryResult<Reservation> {
    let stored = repo.create_reservation(reservation).await?;
    info!(
        "Service layer: created reservation {} for unit {} ({} to {}, party of {})",
        stored.id, stored.unit_id, stored.check_in, stored.check_out, stored.party_size
    );
    Ok(stored)
}

/// Re-validate and update an existing reservation.
///
/// The overlap check excludes the reservation's own id.
pub async fn update_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation_id: ReservationId,
    reservation: &NewReservation,
) -> RepositoryResult<Reservation> {
    let stored = repo.update_reservation(reservation_id, reservation).await?;
    info!(
        "Service layer: updated reservation {} ({} to {})",
        stored.id, stored.check_in, stored.check_out
    );
    Ok(stored)
}

/// Retrieve a reservation by id.
pub async fn get_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation_id: ReservationId,
) -> RepositoryResult<Reservation> {
    repo.get_reservation(reservation_id).await
}

/// List all reservations, ordered by check-in date ascending.
pub async fn list_reservations<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Reservation>> {
    repo.list_reservations().await
}

/// List the reservations for one unit, ordered by check-in date ascending.
pub async fn reservations_for_unit<R: FullRepository + ?Sized>(
    repo: &R,
    unit_id: UnitId,
) -> RepositoryResult<Vec<Reservation>> {
    repo.reservations_for_unit(unit_id, None).await
}

/// Delete a reservation.
pub async fn delete_reservation<R: FullRepository + ?Sized>(
    repo: &R,
    reservation_id: ReservationId,
) -> RepositoryResult<()> {
    repo.delete_reservation(reservation_id).await
}

// ==================== Availability Queries ====================

/// Check whether a unit is free for the proposed `[check_in, check_out)`
/// range, optionally excluding a reservation being edited.
///
/// Pure read: fetches the unit's current reservations and evaluates the
/// availability engine against them. An inverted range reports as
/// unavailable, matching the engine's totality rule.
pub async fn check_availability<R: FullRepository + ?Sized>(
    repo: &R,
    unit_id: UnitId,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude: Option<ReservationId>,
) -> RepositoryResult<bool> {
    let existing = repo.reservations_for_unit(unit_id, exclude).await?;
    Ok(availability::is_unit_available(
        &existing, check_in, check_out, None,
    ))
}

/// Return the booked periods conflicting with the proposed range, ordered by
/// check-in date ascending. Used to build "already booked for these periods"
/// diagnostics.
pub async fn conflicting_periods<R: FullRepository + ?Sized>(
    repo: &R,
    unit_id: UnitId,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude: Option<ReservationId>,
) -> RepositoryResult<Vec<BookedPeriod>> {
    let existing = repo.reservations_for_unit(unit_id, exclude).await?;
    let conflicts = availability::conflicting_reservations(&existing, check_in, check_out, None);
    Ok(conflicts.iter().map(|r| r.period()).collect())
}
