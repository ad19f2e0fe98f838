//! Availability engine: overlap checking and reservation validation.
//!
//! This module is the single source of truth for the booking rules:
//!
//! 1. A stay occupies the half-open range `[check_in, check_out)`, so a
//!    reservation ending on day D and another starting on day D do not
//!    conflict (back-to-back bookings are allowed).
//! 2. The party size must not exceed the unit's capacity.
//! 3. Check-out must be strictly after check-in.
//!
//! All functions here are pure: they take the current reservation set for a
//! unit as input and perform no reads or writes themselves. The repository
//! layer supplies the reservations and is responsible for treating
//! validate-then-persist as a critical section (see the repository
//! implementations).

use chrono::NaiveDate;

use crate::models::{BookedPeriod, Reservation, ReservationId, Unit};

/// Result type for reservation validation.
pub type ValidationResult = Result<(), ValidationError>;

/// A reservation invariant violation.
///
/// The engine reports these synchronously to the caller and never recovers
/// itself; validation is deterministic given the stored state, so retrying
/// without a state change produces the same verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Check-out is not strictly after check-in.
    #[error("check-out date ({check_out}) must be strictly after check-in date ({check_in})")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    /// Requested party size exceeds the unit's capacity.
    #[error("party of {requested} exceeds the unit capacity of {capacity}")]
    CapacityExceeded { requested: u32, capacity: u32 },

    /// The proposed range overlaps one or more existing reservations.
    /// Conflicting periods are ordered by check-in date ascending.
    #[error("unit is already booked for {} overlapping period(s)", conflicts.len())]
    OverlapConflict { conflicts: Vec<BookedPeriod> },
}

/// Test whether two half-open date intervals `[a_start, a_end)` and
/// `[b_start, b_end)` intersect.
///
/// Boundaries are compared with strict inequality so that a shared boundary
/// date does not count as an overlap.
pub fn overlaps(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Return the reservations among `existing` that conflict with the proposed
/// `[check_in, check_out)` range, ordered by check-in date ascending.
///
/// When re-validating an edit, pass the reservation's own id as `exclude` so
/// it is never reported as conflicting with itself.
pub fn conflicting_reservations<'a>(
    existing: &'a [Reservation],
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude: Option<ReservationId>,
) -> Vec<&'a Reservation> {
    let mut conflicts: Vec<&Reservation> = existing
        .iter()
        .filter(|r| exclude != Some(r.id))
        .filter(|r| overlaps(check_in, check_out, r.check_in, r.check_out))
        .collect();
    conflicts.sort_by_key(|r| (r.check_in, r.check_out, r.id));
    conflicts
}

/// Check whether a unit is free for the proposed range.
///
/// Total by design: a `check_out <= check_in` range is reported as
/// unavailable rather than an error, so the function is safe to call with
/// partially validated form input.
pub fn is_unit_available(
    existing: &[Reservation],
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude: Option<ReservationId>,
) -> bool {
    if check_out <= check_in {
        return false;
    }
    conflicting_reservations(existing, check_in, check_out, exclude).is_empty()
}

/// Validate a proposed reservation against a unit and its current
/// reservation set.
///
/// Checks run in a fixed order and fail fast on the first violation:
/// date ordering, then capacity, then overlap. Capacity and overlap checks
/// are meaningless on an inverted range, so the date failure is always
/// reported first.
///
/// Performs no writes; the caller must invoke this immediately before
/// persisting and keep the read-validate-write sequence atomic.
pub fn validate_reservation(
    unit: &Unit,
    existing: &[Reservation],
    check_in: NaiveDate,
    check_out: NaiveDate,
    party_size: u32,
    exclude: Option<ReservationId>,
) -> ValidationResult {
    if check_out <= check_in {
        return Err(ValidationError::InvalidDateRange {
            check_in,
            check_out,
        });
    }

    if party_size > unit.capacity {
        return Err(ValidationError::CapacityExceeded {
            requested: party_size,
            capacity: unit.capacity,
        });
    }

    let conflicts = conflicting_reservations(existing, check_in, check_out, exclude);
    if !conflicts.is_empty() {
        return Err(ValidationError::OverlapConflict {
            conflicts: conflicts.iter().map(|r| r.period()).collect(),
        });
    }

    Ok(())
}
