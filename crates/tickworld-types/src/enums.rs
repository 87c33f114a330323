//! Enumeration types for the Tickworld simulation.
//!
//! Entity kinds replace a class hierarchy of marker types: filtered queries
//! check a kind or a capability (such as [`EntityKind::blocks_movement`])
//! instead of walking a type chain.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Error returned when a textual tag does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {vocabulary} tag: {tag:?}")]
pub struct UnknownTag {
    /// Which vocabulary was being parsed (e.g. `"action"`).
    pub vocabulary: &'static str,
    /// The offending input.
    pub tag: String,
}

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The kind tag carried by every entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// A policy-driven agent.
    Agent,
    /// A generic obstacle: blocks movement into its cell.
    Obstacle,
    /// A border wall. Walls are obstacles.
    Wall,
    /// A consumable dirt patch.
    Dirt,
    /// Any other passive thing.
    Thing,
}

impl EntityKind {
    /// Whether an entity of this kind blocks movement into its cell.
    pub const fn blocks_movement(self) -> bool {
        matches!(self, Self::Obstacle | Self::Wall)
    }

    /// Human-readable kind name, also used as the default entity label.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::Obstacle => "Obstacle",
            Self::Wall => "Wall",
            Self::Dirt => "Dirt",
            Self::Thing => "Thing",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Headings
// ---------------------------------------------------------------------------

/// One of the four cardinal unit directions on the grid.
///
/// `y` grows downwards, so [`Heading::North`] is `(0, -1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Heading {
    /// `(1, 0)`
    East,
    /// `(0, 1)`
    South,
    /// `(-1, 0)`
    West,
    /// `(0, -1)`
    North,
}

impl Heading {
    /// The fixed cyclic order used by [`Heading::turn`].
    pub const CYCLE: [Self; 4] = [Self::East, Self::South, Self::West, Self::North];

    /// The unit vector `(dx, dy)` of this heading.
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
            Self::North => (0, -1),
        }
    }

    const fn index(self) -> i64 {
        match self {
            Self::East => 0,
            Self::South => 1,
            Self::West => 2,
            Self::North => 3,
        }
    }

    /// Rotate by `increment` steps through [`Heading::CYCLE`], wrapping in
    /// both directions.
    pub fn turn(self, increment: i32) -> Self {
        let idx = self.index().saturating_add(i64::from(increment)).rem_euclid(4);
        match idx {
            0 => Self::East,
            1 => Self::South,
            2 => Self::West,
            _ => Self::North,
        }
    }
}

// ---------------------------------------------------------------------------
// Vacuum world vocabulary
// ---------------------------------------------------------------------------

/// Cleanliness of the cell an agent stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Cleanliness {
    /// At least one dirt entity occupies the cell.
    Dirty,
    /// No dirt here.
    Clean,
}

impl fmt::Display for Cleanliness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dirty => "Dirty",
            Self::Clean => "Clean",
        })
    }
}

/// Actions understood by the vacuum world.
///
/// `NoOp` is the single canonical spelling of the free action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum VacuumAction {
    /// Move one cell east.
    Right,
    /// Move one cell west.
    Left,
    /// Move one cell north (`y - 1`).
    Up,
    /// Move one cell south (`y + 1`).
    Down,
    /// Remove one dirt entity from the current cell.
    Suck,
    /// Do nothing; the only action that costs no performance.
    NoOp,
}

impl VacuumAction {
    /// Every action, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::Up,
        Self::Down,
        Self::Suck,
        Self::NoOp,
    ];

    /// The four movement actions.
    pub const MOVES: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// The heading a movement action travels in, or `None` for non-moves.
    pub const fn heading(self) -> Option<Heading> {
        match self {
            Self::Right => Some(Heading::East),
            Self::Left => Some(Heading::West),
            Self::Up => Some(Heading::North),
            Self::Down => Some(Heading::South),
            Self::Suck | Self::NoOp => None,
        }
    }

    /// Canonical tag of this action.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Right => "Right",
            Self::Left => "Left",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Suck => "Suck",
            Self::NoOp => "NoOp",
        }
    }
}

impl fmt::Display for VacuumAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for VacuumAction {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.tag() == s)
            .ok_or_else(|| UnknownTag {
                vocabulary: "action",
                tag: s.to_owned(),
            })
    }
}
