//! The stepping engine: percept, action, effect.
//!
//! Each call to [`Environment::step`] runs three phases:
//!
//! 1. **Perception** -- every registered agent receives a percept computed
//!    from the world exactly as it stood at the start of the tick. All
//!    percepts are taken before any program runs, so no agent can see what
//!    another agent did during the same tick.
//!
//! 2. **Action** -- each agent's program turns its percept into an action,
//!    and the environment applies the actions one by one in registration
//!    order, updating performance as it goes.
//!
//! 3. **Exogenous change** -- the environment applies its own spontaneous
//!    change, once, after all actions.
//!
//! Nothing is caught mid-step: an error from an action handler ends the step
//! and reaches the caller unchanged.

use core::fmt;

use serde::Serialize;
use tickworld_types::{Coord, EntityId, ObjectClass};
use tracing::{debug, info, warn};

use crate::entity::Entity;
use crate::error::WorldError;
use crate::world::{KindFilter, Object, Removal, World};

/// Summary of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSummary {
    /// The tick number that was just completed (1-based).
    pub tick: u64,
    /// Number of actions applied this tick.
    pub actions_applied: usize,
    /// Number of living agents at the end of the tick.
    pub agents_alive: usize,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEndReason {
    /// No registered agent is alive (or none is registered).
    AllAgentsDone,
    /// The step budget was used up.
    StepBudgetExhausted,
}

/// Result of [`Environment::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Why the run stopped.
    pub end_reason: RunEndReason,
    /// Number of steps executed by this run.
    pub steps_executed: u64,
    /// Summary of the last executed step, if any.
    pub final_summary: Option<StepSummary>,
}

/// An environment: a world of entities plus the rules that drive it.
///
/// Concrete environments must define [`percept`](Environment::percept) and
/// [`execute_action`](Environment::execute_action); the rest of the cycle
/// (stepping, running, placement, deletion) is provided. The hook methods
/// (`default_location`, `check_location`, `after_add`, `after_delete`) let
/// extensions such as the spatial grid layer their behaviour on top of the
/// base registration.
pub trait Environment {
    /// What an agent perceives each tick.
    type Percept: fmt::Debug + 'static;
    /// What an agent's program returns.
    type Action: fmt::Debug + 'static;

    /// The entity store.
    fn world(&self) -> &World<Self::Percept, Self::Action>;

    /// Mutable access to the entity store.
    ///
    /// Through this handle only performance and aliveness can change;
    /// membership and placement go through [`add_object`],
    /// [`delete_object`], and the spatial layer.
    ///
    /// [`add_object`]: Environment::add_object
    /// [`delete_object`]: Environment::delete_object
    fn world_mut(&mut self) -> &mut World<Self::Percept, Self::Action>;

    /// The percept `agent` receives in the current world state.
    fn percept(&self, agent: EntityId) -> Result<Self::Percept, WorldError>;

    /// Apply the effects of `action` taken by `agent`, including the
    /// agent's performance update.
    fn execute_action(&mut self, agent: EntityId, action: &Self::Action) -> Result<(), WorldError>;

    /// Kinds of objects a user may place into this environment.
    fn object_classes(&self) -> Vec<ObjectClass> {
        Vec::new()
    }

    /// Location for an object added without one.
    fn default_location(&mut self, _entity: &Entity) -> Option<Coord> {
        None
    }

    /// Validate an explicit or default placement.
    fn check_location(&self, _location: Coord) -> Result<(), WorldError> {
        Ok(())
    }

    /// Called once an object has been registered.
    fn after_add(&mut self, _id: EntityId) {}

    /// Called once an object has been removed.
    fn after_delete(&mut self, _entity: &Entity) {}

    /// Whether the simulation is over: by default, when no agent is alive.
    fn is_done(&self) -> bool {
        self.world().alive_agent_count() == 0
    }

    /// Spontaneous change not caused by any agent. Runs once per step.
    fn exogenous_change(&mut self) -> Result<(), WorldError> {
        Ok(())
    }

    // -------------------------------------------------------------------
    // Provided operations
    // -------------------------------------------------------------------

    /// Entities exactly at `location` that pass `filter`.
    fn list_objects_at(&self, location: Coord, filter: KindFilter) -> Vec<&Entity> {
        self.world().list_objects_at(location, filter)
    }

    /// Whether any entity at `location` passes `filter`.
    fn some_objects_at(&self, location: Coord, filter: KindFilter) -> bool {
        self.world().some_objects_at(location, filter)
    }

    /// Place an object (explicitly, or at the default location) and
    /// register it. Agents have their performance reset and their program
    /// traced.
    fn add_object<O>(&mut self, object: O, location: Option<Coord>) -> Result<EntityId, WorldError>
    where
        O: Into<Object<Self::Percept, Self::Action>>,
        Self: Sized,
    {
        let object = object.into();
        let location = match location {
            Some(location) => Some(location),
            None => self.default_location(object.entity()),
        };
        if let Some(location) = location {
            self.check_location(location)?;
        }
        let id = self.world_mut().insert(object, location);
        self.after_add(id);
        Ok(id)
    }

    /// Remove an entity. Removing a non-member is reported, not fatal.
    fn delete_object(&mut self, id: EntityId) -> Removal<Self::Percept, Self::Action> {
        match self.world_mut().remove(id) {
            Removal::Removed(object) => {
                self.after_delete(object.entity());
                Removal::Removed(object)
            }
            Removal::NotPresent => {
                warn!(
                    entity = %id,
                    world = ?self.world().describe(),
                    "Delete requested for an entity that is not in the world"
                );
                Removal::NotPresent
            }
        }
    }

    /// Run one tick: snapshot percepts, apply actions in registration
    /// order, then apply exogenous change.
    ///
    /// # Errors
    ///
    /// Propagates the first error from `percept`, `execute_action`, or
    /// `exogenous_change`.
    fn step(&mut self) -> Result<StepSummary, WorldError> {
        let tick = self.world().tick().saturating_add(1);
        let agent_ids = self.world().agent_ids();

        // --- Phase 1: Perception (snapshot of the pre-action world) ---
        let percepts = agent_ids
            .iter()
            .map(|&id| self.percept(id).map(|p| (id, p)))
            .collect::<Result<Vec<_>, _>>()?;

        // --- Phase 2a: Decision ---
        let mut actions = Vec::with_capacity(percepts.len());
        for (id, percept) in percepts {
            let agent = self
                .world_mut()
                .agent_mut(id)
                .ok_or(WorldError::NotAnAgent(id))?;
            actions.push((id, agent.decide(&percept)));
        }

        // --- Phase 2b: Action, in registration order ---
        let mut actions_applied: usize = 0;
        for (id, action) in &actions {
            if !self.world().contains(*id) {
                debug!(tick, agent = %id, "Agent left the world before acting");
                continue;
            }
            self.execute_action(*id, action)?;
            actions_applied = actions_applied.saturating_add(1);
        }

        // --- Phase 3: Exogenous change ---
        self.exogenous_change()?;

        let tick = self.world_mut().advance_tick();
        let agents_alive = self.world().alive_agent_count();
        debug!(tick, actions_applied, agents_alive, "Step complete");

        Ok(StepSummary {
            tick,
            actions_applied,
            agents_alive,
        })
    }

    /// Step up to `steps` times, stopping as soon as [`is_done`] holds.
    ///
    /// [`is_done`]: Environment::is_done
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by [`step`](Environment::step).
    fn run(&mut self, steps: u64) -> Result<RunSummary, WorldError> {
        info!(
            steps,
            start_tick = self.world().tick(),
            agents = self.world().agent_count(),
            "Run starting"
        );

        let mut steps_executed: u64 = 0;
        let mut final_summary = None;

        let end_reason = loop {
            if self.is_done() {
                break RunEndReason::AllAgentsDone;
            }
            if steps_executed >= steps {
                break RunEndReason::StepBudgetExhausted;
            }
            final_summary = Some(self.step()?);
            steps_executed = steps_executed.saturating_add(1);
        };

        info!(
            reason = ?end_reason,
            steps_executed,
            final_tick = self.world().tick(),
            "Run ended"
        );

        Ok(RunSummary {
            end_reason,
            steps_executed,
            final_summary,
        })
    }
}
