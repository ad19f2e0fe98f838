//! Diesel row types and mappings to the domain model.
//!
//! Postgres stores capacities and party sizes as `integer` columns; rows are
//! mapped back into the `u32` domain fields with checked conversions so a
//! corrupt negative value surfaces as an error instead of wrapping.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{reservations, units};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{Reservation, ReservationId, Unit, UnitId};

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = units)]
pub struct UnitRow {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = units)]
pub struct NewUnitRow {
    pub name: String,
    pub capacity: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = reservations)]
#[diesel(belongs_to(UnitRow, foreign_key = unit_id))]
pub struct ReservationRow {
    pub id: i64,
    pub unit_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub party_size: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reservations)]
pub struct NewReservationRow {
    pub unit_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub party_size: i32,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = reservations)]
pub struct ReservationChangeset {
    pub unit_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guest_name: String,
    pub party_size: i32,
}

impl TryFrom<UnitRow> for Unit {
    type Error = RepositoryError;

    fn try_from(row: UnitRow) -> RepositoryResult<Self> {
        let capacity = u32::try_from(row.capacity).map_err(|_| {
            RepositoryError::internal(format!(
                "Unit {} has negative capacity {}",
                row.id, row.capacity
            ))
        })?;
        Ok(Unit {
            id: UnitId::new(row.id),
            name: row.name,
            capacity,
        })
    }
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = RepositoryError;

    fn try_from(row: ReservationRow) -> RepositoryResult<Self> {
        let party_size = u32::try_from(row.party_size).map_err(|_| {
            RepositoryError::internal(format!(
                "Reservation {} has negative party size {}",
                row.id, row.party_size
            ))
        })?;
        Ok(Reservation {
            id: ReservationId::new(row.id),
            unit_id: UnitId::new(row.unit_id),
            check_in: row.check_in,
            check_out: row.check_out,
            guest_name: row.guest_name,
            party_size,
        })
    }
}

/// Convert a row set into domain reservations, failing on the first corrupt
/// row.
pub fn reservations_from_rows(rows: Vec<ReservationRow>) -> RepositoryResult<Vec<Reservation>> {
    rows.into_iter().map(Reservation::try_from).collect()
}

/// Clamp a `u32` domain count into the `integer` column type.
pub fn count_to_column(value: u32, what: &str) -> RepositoryResult<i32> {
    i32::try_from(value)
        .map_err(|_| RepositoryError::internal(format!("{} {} exceeds column range", what, value)))
}
