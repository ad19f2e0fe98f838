//! PostgreSQL repository implementation using Diesel.
//!
//! Connections come from an r2d2 pool; Diesel is synchronous, so every
//! operation runs inside `tokio::task::spawn_blocking`.
//!
//! # Write discipline
//!
//! Reservation writes run the read-validate-insert sequence inside a
//! `SERIALIZABLE` transaction. Two racing bookings for the same unit cannot
//! both commit: one of them fails with a serialization failure, which maps
//! to a retryable [`RepositoryError`].

pub mod models;
pub mod schema;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use log::info;

use self::models::{
    count_to_column, reservations_from_rows, NewReservationRow, NewUnitRow, ReservationChangeset,
    ReservationRow, UnitRow,
};
use self::schema::{reservations, units};
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, ReservationRepository, UnitRepository,
};
use crate::models::{NewReservation, NewUnit, Reservation, ReservationId, Unit, UnitId};
use crate::services::availability;

type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Connection configuration for the Postgres backend.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub max_pool_size: u32,
}

impl PostgresConfig {
    /// Build the configuration from environment variables.
    ///
    /// Reads `DATABASE_URL` (or `PG_DATABASE_URL`) and optionally
    /// `PG_MAX_POOL_SIZE` (default: 10).
    pub fn from_env() -> RepositoryResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| {
                RepositoryError::configuration(
                    "DATABASE_URL environment variable is required for the Postgres backend",
                )
            })?;

        let max_pool_size = std::env::var("PG_MAX_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Ok(Self {
            database_url,
            max_pool_size,
        })
    }
}

/// Postgres-backed repository.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a repository from a configuration, building the connection
    /// pool eagerly so misconfiguration fails at startup.
    pub fn new(config: &PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .build(manager)
            .map_err(|e| RepositoryError::connection(format!("Failed to build pool: {}", e)))?;

        info!(
            "Postgres repository initialized (pool size {})",
            config.max_pool_size
        );
        Ok(Self { pool })
    }

    /// Run a synchronous Diesel closure on the blocking thread pool.
    async fn run_blocking<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| RepositoryError::internal(format!("Blocking task join error: {}", e)))?
    }
}

/// Load a unit row inside an open transaction.
fn load_unit(conn: &mut PgConnection, unit_id: UnitId) -> RepositoryResult<Unit> {
    let row: Option<UnitRow> = units::table
        .find(unit_id.value())
        .first(conn)
        .optional()?;
    let row = row.ok_or_else(|| {
        RepositoryError::not_found_with_context(
            format!("Unit {} not found", unit_id),
            ErrorContext::default()
                .with_entity("unit")
                .with_entity_id(unit_id),
        )
    })?;
    Unit::try_from(row)
}

/// Load a unit's reservations (ascending by check-in) inside an open
/// transaction, optionally excluding one reservation id.
fn load_reservations_for_unit(
    conn: &mut PgConnection,
    unit_id: UnitId,
    exclude: Option<ReservationId>,
) -> RepositoryResult<Vec<Reservation>> {
    let mut query = reservations::table
        .filter(reservations::unit_id.eq(unit_id.value()))
        .into_boxed();
    if let Some(excluded) = exclude {
        query = query.filter(reservations::id.ne(excluded.value()));
    }
    let rows: Vec<ReservationRow> = query
        .order((
            reservations::check_in.asc(),
            reservations::check_out.asc(),
            reservations::id.asc(),
        ))
        .load(conn)?;
    reservations_from_rows(rows)
}

#[async_trait]
impl UnitRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.run_blocking(|conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn create_unit(&self, unit: &NewUnit) -> RepositoryResult<Unit> {
        let new_row = NewUnitRow {
            name: unit.name.clone(),
            capacity: count_to_column(unit.capacity, "capacity")?,
        };
        self.run_blocking(move |conn| {
            let row: UnitRow = diesel::insert_into(units::table)
                .values(&new_row)
                .get_result(conn)?;
            Unit::try_from(row)
        })
        .await
    }

    async fn get_unit(&self, unit_id: UnitId) -> RepositoryResult<Unit> {
        self.run_blocking(move |conn| load_unit(conn, unit_id)).await
    }

    async fn list_units(&self) -> RepositoryResult<Vec<Unit>> {
        self.run_blocking(|conn| {
            let rows: Vec<UnitRow> = units::table.order(units::id.asc()).load(conn)?;
            rows.into_iter().map(Unit::try_from).collect()
        })
        .await
    }

    async fn delete_unit(&self, unit_id: UnitId) -> RepositoryResult<()> {
        self.run_blocking(move |conn| {
            conn.build_transaction()
                .serializable()
                .run(|conn| -> RepositoryResult<()> {
                    // Explicit cascade so behavior does not depend on the
                    // foreign key's ON DELETE clause.
                    diesel::delete(
                        reservations::table.filter(reservations::unit_id.eq(unit_id.value())),
                    )
                    .execute(conn)?;

                    let deleted =
                        diesel::delete(units::table.find(unit_id.value())).execute(conn)?;
                    if deleted == 0 {
                        return Err(RepositoryError::not_found_with_context(
                            format!("Unit {} not found", unit_id),
                            ErrorContext::new("delete_unit")
                                .with_entity("unit")
                                .with_entity_id(unit_id),
                        ));
                    }
                    Ok(())
                })
        })
        .await
    }
}

#[async_trait]
impl ReservationRepository for PostgresRepository {
    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation> {
        let input = reservation.clone();
        self.run_blocking(move |conn| {
            conn.build_transaction()
                .serializable()
                .run(|conn| -> RepositoryResult<Reservation> {
                    let unit = load_unit(conn, input.unit_id)?;
                    let existing = load_reservations_for_unit(conn, input.unit_id, None)?;
                    availability::validate_reservation(
                        &unit,
                        &existing,
                        input.check_in,
                        input.check_out,
                        input.party_size,
                        None,
                    )
                    .map_err(|e| {
                        RepositoryError::validation_with_context(
                            e,
                            ErrorContext::new("create_reservation")
                                .with_entity("reservation")
                                .with_details(format!("unit_id={}", input.unit_id)),
                        )
                    })?;

                    let new_row = NewReservationRow {
                        unit_id: input.unit_id.value(),
                        check_in: input.check_in,
                        check_out: input.check_out,
                        guest_name: input.guest_name.clone(),
                        party_size: count_to_column(input.party_size, "party_size")?,
                    };
                    let row: ReservationRow = diesel::insert_into(reservations::table)
                        .values(&new_row)
                        .get_result(conn)?;
                    Reservation::try_from(row)
                })
        })
        .await
    }

    async fn update_reservation(
        &self,
        reservation_id: ReservationId,
        reservation: &NewReservation,
    ) -> RepositoryResult<Reservation> {
        let input = reservation.clone();
        self.run_blocking(move |conn| {
            conn.build_transaction()
                .serializable()
                .run(|conn| -> RepositoryResult<Reservation> {
                    let current: Option<ReservationRow> = reservations::table
                        .find(reservation_id.value())
                        .first(conn)
                        .optional()?;
                    if current.is_none() {
                        return Err(RepositoryError::not_found_with_context(
                            format!("Reservation {} not found", reservation_id),
                            ErrorContext::new("update_reservation")
                                .with_entity("reservation")
                                .with_entity_id(reservation_id),
                        ));
                    }

                    let unit = load_unit(conn, input.unit_id)?;
                    let existing =
                        load_reservations_for_unit(conn, input.unit_id, Some(reservation_id))?;
                    availability::validate_reservation(
                        &unit,
                        &existing,
                        input.check_in,
                        input.check_out,
                        input.party_size,
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

                    let changeset = ReservationChangeset {
                        unit_id: input.unit_id.value(),
                        check_in: input.check_in,
                        check_out: input.check_out,
                        guest_name: input.guest_name.clone(),
                        party_size: count_to_column(input.party_size, "party_size")?,
                    };
                    let row: ReservationRow =
                        diesel::update(reservations::table.find(reservation_id.value()))
                            .set(&changeset)
                            .get_result(conn)?;
                    Reservation::try_from(row)
                })
        })
        .await
    }

    async fn get_reservation(
        &self,
        reservation_id: ReservationId,
    ) -> RepositoryResult<Reservation> {
        self.run_blocking(move |conn| {
            let row: Option<ReservationRow> = reservations::table
                .find(reservation_id.value())
                .first(conn)
                .optional()?;
            let row = row.ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Reservation {} not found", reservation_id),
                    ErrorContext::default()
                        .with_entity("reservation")
                        .with_entity_id(reservation_id),
                )
            })?;
            Reservation::try_from(row)
        })
        .await
    }

    async fn list_reservations(&self) -> RepositoryResult<Vec<Reservation>> {
        self.run_blocking(|conn| {
            let rows: Vec<ReservationRow> = reservations::table
                .order((
                    reservations::check_in.asc(),
                    reservations::check_out.asc(),
                    reservations::id.asc(),
                ))
                .load(conn)?;
            reservations_from_rows(rows)
        })
        .await
    }

    async fn reservations_for_unit(
        &self,
        unit_id: UnitId,
        exclude: Option<ReservationId>,
    ) -> RepositoryResult<Vec<Reservation>> {
        self.run_blocking(move |conn| {
            load_unit(conn, unit_id)?;
            load_reservations_for_unit(conn, unit_id, exclude)
        })
        .await
    }

    async fn delete_reservation(&self, reservation_id: ReservationId) -> RepositoryResult<()> {
        self.run_blocking(move |conn| {
            let deleted =
                diesel::delete(reservations::table.find(reservation_id.value())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("Reservation {} not found", reservation_id),
                    ErrorContext::new("delete_reservation")
                        .with_entity("reservation")
                        .with_entity_id(reservation_id),
                ));
            }
            Ok(())
        })
        .await
    }
}
