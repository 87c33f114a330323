//! Plain data structs shared across the workspace: grid coordinates, the
//! vacuum percept, and object-class metadata.

use core::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Cleanliness, EntityKind, Heading};

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// A cell on the integer grid. `x` grows east, `y` grows south.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Coord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Coord {
    /// Construct a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step along `heading`.
    pub const fn step(self, heading: Heading) -> Self {
        let (dx, dy) = heading.unit();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Squared Euclidean distance to `other`. Exact on the integer grid.
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x).saturating_sub(i64::from(other.x));
        let dy = i64::from(self.y).saturating_sub(i64::from(other.y));
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Vacuum percept
// ---------------------------------------------------------------------------

/// What a vacuum agent perceives each tick: the cleanliness of its own cell
/// and where that cell is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VacuumPercept {
    /// `Dirty` if a dirt entity shares the agent's cell.
    pub status: Cleanliness,
    /// The agent's own cell.
    pub location: Coord,
}

// ---------------------------------------------------------------------------
// Object classes
// ---------------------------------------------------------------------------

/// Metadata describing a kind of object a user may place into a world.
///
/// Pure description: listing classes has no effect on the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ObjectClass {
    /// Display name of the class (e.g. `"ReflexVacuumAgent"`).
    pub name: String,
    /// Kind tag of the entities this class produces.
    pub kind: EntityKind,
}

impl ObjectClass {
    /// Construct class metadata.
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether instances of this class are agents.
    pub fn is_agent(&self) -> bool {
        self.kind == EntityKind::Agent
    }
}
