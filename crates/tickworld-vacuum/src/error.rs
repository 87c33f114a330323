//! Error types for the `tickworld-vacuum` crate.

use tickworld_core::WorldError;
use tickworld_types::UnknownTag;

/// Errors raised by the vacuum domain.
#[derive(Debug, thiserror::Error)]
pub enum VacuumError {
    /// An action tag outside the vacuum vocabulary.
    #[error(transparent)]
    UnknownAction(#[from] UnknownTag),

    /// A random agent was given nothing to choose from.
    #[error("random agent needs at least one action")]
    NoActions,

    /// No object class has this name.
    #[error("unknown object class: {0:?}")]
    UnknownClass(String),

    /// An engine operation failed.
    #[error(transparent)]
    World(#[from] WorldError),
}
