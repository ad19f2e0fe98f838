//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. Handlers coerce and sanity-check raw input
//! (non-empty names, positive counts) before calling in; the reservation
//! invariants themselves are enforced by the availability engine inside the
//! repository write, regardless of what the handlers pass.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;

use super::dto::{
    AvailabilityQuery, AvailabilityResponse, CreateUnitRequest, HealthResponse,
    ReservationDto, ReservationListResponse, ReservationRequest, UnitDto, UnitListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{NewReservation, NewUnit, ReservationId, Unit, UnitId};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Coerce a reservation request into the domain input type.
fn coerce_reservation(request: &ReservationRequest) -> Result<NewReservation, AppError> {
    let guest_name = request.guest_name.trim();
    if guest_name.is_empty() {
        return Err(AppError::BadRequest("Guest name must not be empty".into()));
    }
    if request.party_size == 0 {
        return Err(AppError::BadRequest(
            "Party size must be at least 1".into(),
        ));
    }
    Ok(NewReservation {
        unit_id: UnitId::new(request.unit_id),
        check_in: request.check_in,
        check_out: request.check_out,
        guest_name: guest_name.to_string(),
        party_size: request.party_size,
    })
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the storage
/// backend is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Unit CRUD
// =============================================================================

/// GET /v1/units
///
/// List all lodging units.
pub async fn list_units(State(state): State<AppState>) -> HandlerResult<UnitListResponse> {
    let units = db_services::list_units(state.repository.as_ref()).await?;

    let unit_dtos: Vec<UnitDto> = units.into_iter().map(Into::into).collect();
    let total = unit_dtos.len();

    Ok(Json(UnitListResponse {
        units: unit_dtos,
        total,
    }))
}

/// POST /v1/units
///
/// Register a new lodging unit.
pub async fn create_unit(
    State(state): State<AppState>,
    Json(request): Json<CreateUnitRequest>,
) -> Result<(StatusCode, Json<UnitDto>), AppError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Unit name must not be empty".into()));
    }
    if request.capacity == 0 {
        return Err(AppError::BadRequest(
            "Unit capacity must be at least 1".into(),
        ));
    }

    let unit = db_services::create_unit(
        state.repository.as_ref(),
        &NewUnit {
            name: name.to_string(),
            capacity: request.capacity,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(unit.into())))
}

/// GET /v1/units/{unit_id}
///
/// Retrieve a single unit.
pub async fn get_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<i64>,
) -> HandlerResult<UnitDto> {
    let unit = db_services::get_unit(state.repository.as_ref(), UnitId::new(unit_id)).await?;
    Ok(Json(unit.into()))
}

/// DELETE /v1/units/{unit_id}
///
/// Delete a unit and all of its reservations.
pub async fn delete_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_unit(state.repository.as_ref(), UnitId::new(unit_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Per-Unit Queries
// =============================================================================

/// GET /v1/units/{unit_id}/reservations
///
/// List the reservations for one unit, ascending by check-in date.
pub async fn unit_reservations(
    State(state): State<AppState>,
    Path(unit_id): Path<i64>,
) -> HandlerResult<ReservationListResponse> {
    let unit_id = UnitId::new(unit_id);
    let unit = db_services::get_unit(state.repository.as_ref(), unit_id).await?;
    let reservations =
        db_services::reservations_for_unit(state.repository.as_ref(), unit_id).await?;

    let reservation_dtos: Vec<ReservationDto> = reservations
        .into_iter()
        .map(|r| ReservationDto::from_parts(r, &unit))
        .collect();
    let total = reservation_dtos.len();

    Ok(Json(ReservationListResponse {
        reservations: reservation_dtos,
        total,
    }))
}

/// GET /v1/units/{unit_id}/availability
///
/// Check whether the unit is free for a proposed `[check_in, check_out)`
/// range; `exclude` skips a reservation being edited. Returns the conflict
/// list alongside the verdict so callers can build diagnostics.
pub async fn unit_availability(
    State(state): State<AppState>,
    Path(unit_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailabilityResponse> {
    let unit_id = UnitId::new(unit_id);
    let exclude = query.exclude.map(ReservationId::new);

    let available = db_services::check_availability(
        state.repository.as_ref(),
        unit_id,
        query.check_in,
        query.check_out,
        exclude,
    )
    .await?;
    let conflicts = db_services::conflicting_periods(
        state.repository.as_ref(),
        unit_id,
        query.check_in,
        query.check_out,
        exclude,
    )
    .await?;

    Ok(Json(AvailabilityResponse {
        available,
        conflicts,
    }))
}

// =============================================================================
// Reservation CRUD
// =============================================================================

/// GET /v1/reservations
///
/// List all reservations, ascending by check-in date.
pub async fn list_reservations(
    State(state): State<AppState>,
) -> HandlerResult<ReservationListResponse> {
    let repo = state.repository.as_ref();
    let reservations = db_services::list_reservations(repo).await?;
    let units: HashMap<UnitId, Unit> = db_services::list_units(repo)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut reservation_dtos = Vec::with_capacity(reservations.len());
    for reservation in reservations {
        let unit = units.get(&reservation.unit_id).ok_or_else(|| {
            AppError::Internal(format!(
                "Reservation {} references missing unit {}",
                reservation.id, reservation.unit_id
            ))
        })?;
        reservation_dtos.push(ReservationDto::from_parts(reservation, unit));
    }
    let total = reservation_dtos.len();

    Ok(Json(ReservationListResponse {
        reservations: reservation_dtos,
        total,
    }))
}

/// POST /v1/reservations
///
/// Book a stay. The write is validated against the unit's current
/// reservations inside the repository's critical section; a conflicting
/// request gets a 409 with the overlapping periods.
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(request): Json<ReservationRequest>,
) -> Result<(StatusCode, Json<ReservationDto>), AppError> {
    let input = coerce_reservation(&request)?;
    let repo = state.repository.as_ref();

    let reservation = db_services::create_reservation(repo, &input).await?;
    let unit = db_services::get_unit(repo, reservation.unit_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationDto::from_parts(reservation, &unit)),
    ))
}

/// GET /v1/reservations/{reservation_id}
///
/// Retrieve a single reservation.
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<i64>,
) -> HandlerResult<ReservationDto> {
    let repo = state.repository.as_ref();
    let reservation =
        db_services::get_reservation(repo, ReservationId::new(reservation_id)).await?;
    let unit = db_services::get_unit(repo, reservation.unit_id).await?;
    Ok(Json(ReservationDto::from_parts(reservation, &unit)))
}

/// PUT /v1/reservations/{reservation_id}
///
/// Edit a reservation. Re-validates against the unit's other reservations,
/// excluding this reservation's own id, so an edit overlapping only its own
/// prior range is accepted.
pub async fn update_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<i64>,
    Json(request): Json<ReservationRequest>,
) -> HandlerResult<ReservationDto> {
    let input = coerce_reservation(&request)?;
    let repo = state.repository.as_ref();

    let reservation =
        db_services::update_reservation(repo, ReservationId::new(reservation_id), &input).await?;
    let unit = db_services::get_unit(repo, reservation.unit_id).await?;
    Ok(Json(ReservationDto::from_parts(reservation, &unit)))
}

/// DELETE /v1/reservations/{reservation_id}
///
/// Cancel a reservation.
pub async fn delete_reservation(
    State(state): State<AppState>,
    Path(reservation_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_reservation(state.repository.as_ref(), ReservationId::new(reservation_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
