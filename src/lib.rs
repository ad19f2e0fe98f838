//! # Séjour Reservation Backend
//!
//! Backend for a lodging reservation system: register units (name and
//! occupant capacity) and book stays against them. The availability engine
//! guarantees that no two reservations for the same unit overlap in time and
//! that the traveler count never exceeds the unit's capacity, no matter which
//! entry point performs the write. A REST API is exposed via Axum.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types (units, reservations, booked periods)
//! - [`services`]: The availability engine — overlap predicate and
//!   reservation validation, implemented exactly once
//! - [`db`]: Repository pattern, storage backends, and the service layer
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Booking rules
//!
//! A stay occupies the half-open date range `[check_in, check_out)`, so
//! back-to-back bookings sharing a boundary date do not conflict. Writes are
//! validated against the current stored state inside the repository's
//! critical section (write lock locally, serializable transaction on
//! Postgres), so concurrent requests cannot produce a stored double-booking.

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
