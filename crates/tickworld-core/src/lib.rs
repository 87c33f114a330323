//! Stepping engine, spatial grid, and observers for the Tickworld
//! simulation.
//!
//! This crate owns the discrete-time percept/action/effect cycle that
//! drives every environment, independent of any particular domain.
//!
//! # Modules
//!
//! - [`entity`] -- Physical things: walls, dirt, agent bodies.
//! - [`agent`] -- Agents, the [`AgentProgram`] trait, and the tracer the
//!   engine installs on registration.
//! - [`world`] -- The ordered entity store shared by every environment.
//! - [`environment`] -- The [`Environment`] trait: step, run, placement.
//! - [`spatial`] -- The 2D [`Grid`] and the [`SpatialEnvironment`] trait:
//!   movement, collision, perimeter walls.
//! - [`observer`] -- Add/move/delete notifications.
//! - [`compare`] -- Averaging agent performance over seeded instances.
//! - [`config`] -- Configuration loading from `tickworld-config.yaml`.
//! - [`error`] -- [`WorldError`].
//!
//! [`AgentProgram`]: agent::AgentProgram
//! [`Environment`]: environment::Environment
//! [`Grid`]: spatial::Grid
//! [`SpatialEnvironment`]: spatial::SpatialEnvironment
//! [`WorldError`]: error::WorldError

pub mod agent;
pub mod compare;
pub mod config;
pub mod entity;
pub mod environment;
pub mod error;
pub mod observer;
pub mod spatial;
pub mod world;

pub use agent::{Agent, AgentProgram};
pub use compare::{
    AgentFactory, AgentScore, HarnessError, agent_seed, compare_agents, test_agent,
};
pub use config::{ConfigError, SimulationConfig};
pub use entity::Entity;
pub use environment::{Environment, RunEndReason, RunSummary, StepSummary};
pub use error::WorldError;
pub use observer::{EventLog, ObservedEvent, Observer, ObserverHub, TracingObserver};
pub use spatial::{Grid, MoveOutcome, SpatialEnvironment};
pub use world::{KindFilter, Object, Removal, World};

#[doc(hidden)]
pub use tickworld_types as types;
