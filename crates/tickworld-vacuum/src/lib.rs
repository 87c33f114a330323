//! The vacuum cleaning world for the Tickworld simulation.
//!
//! A walled grid with dirt on it. Agents perceive whether their own cell is
//! dirty, move one cell at a time, and earn performance by sucking up dirt.
//!
//! # Modules
//!
//! - [`environment`] -- [`VacuumEnvironment`]: percepts, action effects,
//!   and scoring.
//! - [`builder`] -- [`VacuumWorldBuilder`] for seeded dirty worlds.
//! - [`classes`] -- [`VacuumClass`]: the objects a user may instantiate.
//! - [`programs`] -- Random, reflex, and simple reflex agent programs.
//! - [`error`] -- [`VacuumError`].
//!
//! [`VacuumEnvironment`]: environment::VacuumEnvironment
//! [`VacuumWorldBuilder`]: builder::VacuumWorldBuilder
//! [`VacuumClass`]: classes::VacuumClass
//! [`VacuumError`]: error::VacuumError

pub mod builder;
pub mod classes;
pub mod environment;
pub mod error;
pub mod programs;

use tickworld_types::VacuumAction;

pub use builder::VacuumWorldBuilder;
pub use classes::{VacuumClass, agent_factories};
pub use environment::VacuumEnvironment;
pub use error::VacuumError;
pub use programs::{
    RandomAgent, ReflexVacuumProgram, SimpleReflexProgram, VacuumAgent, random_vacuum_agent,
    reflex_vacuum_agent, simple_reflex_agent,
};

/// Parse an action tag from the vacuum vocabulary.
///
/// # Errors
///
/// Returns [`VacuumError::UnknownAction`] for anything other than `Right`,
/// `Left`, `Up`, `Down`, `Suck`, or `NoOp`.
pub fn parse_action(tag: &str) -> Result<VacuumAction, VacuumError> {
    Ok(tag.parse()?)
}
