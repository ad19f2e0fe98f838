//! Lodging unit types.

use serde::{Deserialize, Serialize};

/// Stable identifier for a lodging unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct UnitId(pub i64);

impl UnitId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rentable lodging unit.
///
/// The unit is the aggregation root for booking conflicts: two reservations
/// can only conflict when they belong to the same unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    /// Display name, non-empty.
    pub name: String,
    /// Maximum number of occupants.
    pub capacity: u32,
}

/// Input payload for creating a unit; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUnit {
    pub name: String,
    pub capacity: u32,
}
