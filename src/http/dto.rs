//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BookedPeriod, Reservation, Unit};

/// Request body for creating a unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUnitRequest {
    /// Display name for the unit
    pub name: String,
    /// Maximum number of occupants
    pub capacity: u32,
}

/// Unit representation in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitDto {
    pub id: i64,
    pub name: String,
    pub capacity: u32,
}

impl From<Unit> for UnitDto {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id.value(),
            name: unit.name,
            capacity: unit.capacity,
        }
    }
}

/// Unit list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitListResponse {
    pub units: Vec<UnitDto>,
    pub total: usize,
}

/// Request body for creating or updating a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Id of the unit to book
    pub unit_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub party_size: u32,
}

/// Reservation representation in API responses.
///
/// Enriched with the owning unit's name and capacity so clients do not need
/// a second lookup to render a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationDto {
    pub id: i64,
    pub unit_id: i64,
    pub unit_name: String,
    pub unit_capacity: u32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub party_size: u32,
}

impl ReservationDto {
    /// Build the response DTO from a reservation and its owning unit.
    pub fn from_parts(reservation: Reservation, unit: &Unit) -> Self {
        Self {
            id: reservation.id.value(),
            unit_id: reservation.unit_id.value(),
            unit_name: unit.name.clone(),
            unit_capacity: unit.capacity,
            check_in: reservation.check_in,
            check_out: reservation.check_out,
            guest_name: reservation.guest_name,
            party_size: reservation.party_size,
        }
    }
}

/// Reservation list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationListResponse {
    pub reservations: Vec<ReservationDto>,
    pub total: usize,
}

/// Query parameters for the availability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Reservation id to exclude (when re-checking an edit)
    #[serde(default)]
    pub exclude: Option<i64>,
}

/// Availability check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the proposed range is free of conflicts
    pub available: bool,
    /// Conflicting booked periods, ordered by check-in date ascending
    pub conflicts: Vec<BookedPeriod>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub database: String,
}
