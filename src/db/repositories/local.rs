//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMaps, providing fast, deterministic, and isolated
//! execution.
//!
//! # Write discipline
//!
//! Reservation writes take the `RwLock` write guard before reading the
//! current reservation set and hold it through validation and the insert.
//! Two concurrent bookings for the same unit therefore serialize: the second
//! one validates against a state that already contains the first, so a
//! stored double-booking is impossible.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, ReservationRepository, UnitRepository,
};
use crate::models::{NewReservation, NewUnit, Reservation, ReservationId, Unit, UnitId};
use crate::services::availability;

/// In-memory local repository.
///
/// # Example
/// ```
/// use sejour::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// assert_eq!(repo.unit_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    units: HashMap<UnitId, Unit>,
    reservations: HashMap<ReservationId, Reservation>,

    // ID counters
    next_unit_id: i64,
    next_reservation_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            units: HashMap::new(),
            reservations: HashMap::new(),
            next_unit_id: 1,
            next_reservation_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    /// Reservations for one unit, ordered by check-in ascending.
    fn reservations_for_unit(
        &self,
        unit_id: UnitId,
        exclude: Option<ReservationId>,
    ) -> Vec<Reservation> {
        let mut reservations: Vec<Reservation> = self
            .reservations
            .values()
            .filter(|r| r.unit_id == unit_id && exclude != Some(r.id))
            .cloned()
            .collect();
        reservations.sort_by_key(|r| (r.check_in, r.check_out, r.id));
        reservations
    }

    fn unit(&self, unit_id: UnitId) -> RepositoryResult<&Unit> {
        self.units.get(&unit_id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Unit {} not found", unit_id),
                ErrorContext::default()
                    .with_entity("unit")
                    .with_entity_id(unit_id),
            )
        })
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        let is_healthy = data.is_healthy;
        *data = LocalData {
            is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of units stored.
    pub fn unit_count(&self) -> usize {
        self.data.read().units.len()
    }

    /// Get the number of reservations stored.
    pub fn reservation_count(&self) -> usize {
        self.data.read().reservations.len()
    }

    /// Helper to check health and return an error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Repository is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_unit(&self, unit: &NewUnit) -> RepositoryResult<Unit> {
        self.check_health()?;
        let mut data = self.data.write();

        let id = UnitId::new(data.next_unit_id);
        data.next_unit_id += 1;

        let stored = Unit {
            id,
            name: unit.name.clone(),
            capacity: unit.capacity,
        };
        data.units.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_unit(&self, unit_id: UnitId) -> RepositoryResult<Unit> {
        self.check_health()?;
        let data = self.data.read();
        data.unit(unit_id).map(Unit::clone)
    }

    async fn list_units(&self) -> RepositoryResult<Vec<Unit>> {
        self.check_health()?;
        let data = self.data.read();
        let mut units: Vec<Unit> = data.units.values().cloned().collect();
        units.sort_by_key(|u| u.id);
        Ok(units)
    }

    async fn delete_unit(&self, unit_id: UnitId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();

        if data.units.remove(&unit_id).is_none() {
            return Err(RepositoryError::not_found_with_context(
                format!("Unit {} not found", unit_id),
                ErrorContext::new("delete_unit")
                    .with_entity("unit")
                    .with_entity_id(unit_id),
            ));
        }

        // Cascading ownership: a unit's reservations go with it.
        data.reservations.retain(|_, r| r.unit_id != unit_id);
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for LocalRepository {
    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation> {
        self.check_health()?;

        // Critical section: validate against the current state and insert
        // under the same write guard.
        let mut data = self.data.write();

        let unit = data.unit(reservation.unit_id)?.clone();
        let existing = data.reservations_for_unit(reservation.unit_id, None);
        availability::validate_reservation(
            &unit,
            &existing,
            reservation.check_in,
            reservation.check_out,
            reservation.party_size,
            None,
        )
        .map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("create_reservation")
                    .with_entity("reservation")
                    .with_details(format!("unit_id={}", reservation.unit_id)),
            )
        })?;

        let id = ReservationId::new(data.next_reservation_id);
        data.next_reservation_id += 1;

        let stored = Reservation {
            id,
            unit_id: reservation.unit_id,
            check_in: reservation.check_in,
            check_out: reservation.check_out,
            guest_name: reservation.guest_name.clone(),
            party_size: reservation.party_size,
        };
        data.reservations.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_reservation(
        &self,
        reservation_id: ReservationId,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation> {
        self.check_health()?;
        let mut data = self.data.write();

        if !data.reservations.contains_key(&reservation_id) {
            return Err(RepositoryError::not_found_with_context(
                format!("Reservation {} not found", reservation_id),
                ErrorContext::new("update_reservation")
                    .with_entity("reservation")
                    .with_entity_id(reservation_id),
            ));
        }

        let unit = data.unit(reservation.unit_id)?.clone();
        // The reservation being edited is excluded so it never conflicts
        // with its own stored range.
        let existing = data.reservations_for_unit(reservation.unit_id, Some(reservation_id));
        availability::validate_reservation(
            &unit,
            &existing,
            reservation.check_in,
            reservation.check_out,
            reservation.party_size,
            Some(reservation_id),
        )
        .map_err(|e| {
            RepositoryError::validation_with_context(
                e,
                ErrorContext::new("update_reservation")
                    .with_entity("reservation")
                    .with_entity_id(reservation_id),
            )
        })?;

        let stored = Reservation {
            id: reservation_id,
            unit_id: reservation.unit_id,
            check_in: reservation.check_in,
            check_out: reservation.check_out,
            guest_name: reservation.guest_name.clone(),
            party_size: reservation.party_size,
        };
        data.reservations.insert(reservation_id, stored.clone());
        Ok(stored)
    }

    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> RepositoryResult<Reservation> {
        self.check_health()?;
        let data = self.data.read();
        data.reservations
            .get(&reservation_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Reservation {} not found", reservation_id),
                    ErrorContext::default()
                        .with_entity("reservation")
                        .with_entity_id(reservation_id),
                )
            })
    }

    async fn list_reservations(&self) -> RepositoryResult<Vec<Reservation>> {
        self.check_health()?;
        let data = self.data.read();
        let mut reservations: Vec<Reservation> = data.reservations.values().cloned().collect();
        reservations.sort_by_key(|r| (r.check_in, r.check_out, r.id));
        Ok(reservations)
    }

    async fn reservations_for_unit(
        &self,
        unit_id: UnitId,
        exclude: Option<ReservationId>,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.check_health()?;
        let data = self.data.read();
        data.unit(unit_id)?;
        Ok(data.reservations_for_unit(unit_id, exclude))
    }

    async fn delete_reservation(&self, reservation_id: ReservationId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        if data.reservations.remove(&reservation_id).is_none() {
            return Err(RepositoryError::not_found_with_context(
                format!("Reservation {} not found", reservation_id),
                ErrorContext::new("delete_reservation")
                    .with_entity("reservation")
                    .with_entity_id(reservation_id),
            ));
        }
        Ok(())
    }
}
