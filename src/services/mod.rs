//! Business logic services.
//!
//! The only service with real decision content is the availability engine,
//! which owns the overlap predicate and the reservation validation sequence.
//! Every entry point (HTTP handlers, repository writes) calls into this one
//! implementation; none re-derives the rules locally.

pub mod availability;


pub use availability::{
    conflicting_reservations, is_unit_available, overlaps, validate_reservation, ValidationError,
    ValidationResult,
};
