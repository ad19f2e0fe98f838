//! Reservation types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::unit::UnitId;

/// Stable identifier for a reservation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl ReservationId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A booked stay against a unit.
///
/// The stay occupies the half-open date range `[check_in, check_out)`:
/// the check-out day itself is free, so back-to-back bookings sharing a
/// boundary date do not conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub unit_id: UnitId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Name of the booking guest, non-empty.
    pub guest_name: String,
    /// Number of travelers; must not exceed the unit's capacity.
    pub party_size: u32,
}

impl Reservation {
    /// The booked period of this reservation.
    pub fn period(&self) -> BookedPeriod {
        BookedPeriod {
            check_in: self.check_in,
            check_out: self.check_out,
        }
    }
}

/// Input payload for creating or updating a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub unit_id: UnitId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub party_size: u32,
}

/// A `[check_in, check_out)` date range, used in conflict diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookedPeriod {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl std::fmt::Display for BookedPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.check_in, self.check_out)
    }
}
