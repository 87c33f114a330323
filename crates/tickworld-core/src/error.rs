//! Error types for the `tickworld-core` crate.
//!
//! World operations return [`WorldError`]. Deleting an entity that is not in
//! the world is deliberately *not* an error: it is reported through
//! [`Removal::NotPresent`] so a run can continue.
//!
//! [`Removal::NotPresent`]: crate::world::Removal::NotPresent

use tickworld_types::{Coord, EntityId};

/// Errors that can occur while placing, moving, or stepping entities.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// No entity with this id is registered in the world.
    #[error("entity not found: {0}")]
    UnknownEntity(EntityId),

    /// The id names a registered entity that is not an agent.
    #[error("entity {0} is not an agent")]
    NotAnAgent(EntityId),

    /// The entity has no location, but the operation needs one.
    #[error("entity {0} has not been placed")]
    Unplaced(EntityId),

    /// A placement fell outside a bounded grid.
    #[error("location {location} is outside the {width}x{height} grid")]
    OutOfBounds {
        /// The rejected location.
        location: Coord,
        /// Grid width.
        width: i32,
        /// Grid height.
        height: i32,
    },

    /// Perimeter walls were already built for this environment.
    #[error("perimeter walls have already been built")]
    WallsAlreadyBuilt,

    /// A concrete environment could not carry out an action.
    #[error("action failed for agent {agent}: {message}")]
    Action {
        /// The acting agent.
        agent: EntityId,
        /// Description of the failure.
        message: String,
    },
}
