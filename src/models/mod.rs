//! Domain model types for units and reservations.
//!
//! These are the canonical in-memory representations shared by the
//! repository layer, the availability engine, and the HTTP API.

pub mod reservation;
pub mod unit;

pub use reservation::{BookedPeriod, NewReservation, Reservation, ReservationId};
pub use unit::{NewUnit, Unit, UnitId};
