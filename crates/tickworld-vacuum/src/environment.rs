//! The vacuum cleaning world.
//!
//! A walled rectangular grid scattered with dirt. Each agent perceives
//! whether its own cell is dirty and where it stands, and may move one cell,
//! suck up dirt, or do nothing.
//!
//! # Scoring
//!
//! | Action | Effect | Performance |
//! |---|---|---|
//! | `Suck` on a dirty cell | one dirt entity removed | +100 |
//! | `Suck` on a clean cell | none | 0 |
//! | `Left`/`Right`/`Up`/`Down` | move unless blocked | 0 |
//! | every action except `NoOp` | | -1 |

use rand::seq::IndexedRandom;
use tickworld_core::{Entity, Environment, Grid, KindFilter, SpatialEnvironment, WorldError};
use tickworld_types::{
    Cleanliness, Coord, EntityId, EntityKind, ObjectClass, VacuumAction, VacuumPercept,
};
use tracing::{debug, info};

use crate::classes::VacuumClass;

/// Performance gained for each dirt entity removed.
pub const SUCK_REWARD: i64 = 100;

/// Performance charged for every action other than `NoOp`.
pub const ACTION_COST: i64 = 1;

/// A walled grid of dirt and vacuum agents.
#[derive(Debug)]
pub struct VacuumEnvironment {
    grid: Grid<VacuumPercept, VacuumAction>,
}

impl VacuumEnvironment {
    /// Build an empty `width` x `height` world with perimeter walls.
    ///
    /// `seed` drives default placement of objects added without a location.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the walls cannot be placed.
    pub fn new(width: i32, height: i32, seed: u64) -> Result<Self, WorldError> {
        let mut env = Self {
            grid: Grid::bounded(width, height, seed),
        };
        env.add_walls()?;
        info!(width, height, seed, "Vacuum world created");
        Ok(env)
    }

    /// Cells inside the perimeter walls.
    pub fn interior(&self) -> Vec<Coord> {
        let width = self.grid.width();
        let height = self.grid.height();
        (1..height.saturating_sub(1))
            .flat_map(|y| (1..width.saturating_sub(1)).map(move |x| Coord::new(x, y)))
            .collect()
    }

    /// Number of dirt entities at `location`.
    pub fn dirt_at(&self, location: Coord) -> usize {
        self.list_objects_at(location, KindFilter::Kind(EntityKind::Dirt))
            .len()
    }

    /// Total number of dirt entities in the world.
    pub fn dirt_count(&self) -> usize {
        self.world()
            .entities()
            .filter(|e| e.kind() == EntityKind::Dirt)
            .count()
    }

    /// Scatter a dirt entity on `location`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] outside the grid.
    pub fn add_dirt(&mut self, location: Coord) -> Result<EntityId, WorldError> {
        self.add_object(Entity::dirt(), Some(location))
    }

    fn located_agent(&self, agent: EntityId) -> Result<Coord, WorldError> {
        let Some(record) = self.world().agent(agent) else {
            return Err(if self.world().contains(agent) {
                WorldError::NotAnAgent(agent)
            } else {
                WorldError::UnknownEntity(agent)
            });
        };
        record.body().location().ok_or(WorldError::Unplaced(agent))
    }

    fn charge(&mut self, agent: EntityId, delta: i64) -> Result<(), WorldError> {
        self.world_mut()
            .agent_mut(agent)
            .ok_or(WorldError::NotAnAgent(agent))?
            .add_performance(delta);
        Ok(())
    }

    fn suck(&mut self, agent: EntityId, location: Coord) -> Result<(), WorldError> {
        let dirt = self
            .list_objects_at(location, KindFilter::Kind(EntityKind::Dirt))
            .first()
            .map(|e| e.id());
        if let Some(dirt) = dirt {
            self.delete_object(dirt);
            self.charge(agent, SUCK_REWARD)?;
            debug!(agent = %agent, %location, "Dirt removed");
        }
        Ok(())
    }
}

impl Environment for VacuumEnvironment {
    type Percept = VacuumPercept;
    type Action = VacuumAction;

    tickworld_core::grid_hooks!(grid, without default_location);

    fn percept(&self, agent: EntityId) -> Result<VacuumPercept, WorldError> {
        let location = self.located_agent(agent)?;
        let status = if self.some_objects_at(location, KindFilter::Kind(EntityKind::Dirt)) {
            Cleanliness::Dirty
        } else {
            Cleanliness::Clean
        };
        Ok(VacuumPercept { status, location })
    }

    fn execute_action(&mut self, agent: EntityId, action: &VacuumAction) -> Result<(), WorldError> {
        let location = self.located_agent(agent)?;
        if let Some(body) = self.world_mut().entity_mut(agent) {
            body.reset_bump();
        }

        match action.heading() {
            Some(heading) => {
                self.move_to(agent, location.step(heading))?;
            }
            None if *action == VacuumAction::Suck => self.suck(agent, location)?,
            None => {}
        }

        if *action != VacuumAction::NoOp {
            self.charge(agent, ACTION_COST.saturating_neg())?;
        }
        Ok(())
    }

    fn object_classes(&self) -> Vec<ObjectClass> {
        VacuumClass::ALL
            .into_iter()
            .map(VacuumClass::object_class)
            .collect()
    }

    /// A random interior cell free of obstacles. Falls back to any cell when
    /// the grid has no free interior.
    fn default_location(&mut self, _entity: &Entity) -> Option<Coord> {
        let free: Vec<Coord> = self
            .interior()
            .into_iter()
            .filter(|cell| !self.some_objects_at(*cell, KindFilter::Obstacle))
            .collect();
        match free.choose(self.grid.rng()) {
            Some(cell) => Some(*cell),
            None => Some(self.grid.random_location()),
        }
    }
}

impl SpatialEnvironment for VacuumEnvironment {
    fn grid(&self) -> &Grid<VacuumPercept, VacuumAction> {
        &self.grid
    }

    fn grid_mut(&mut self) -> &mut Grid<VacuumPercept, VacuumAction> {
        &mut self.grid
    }
}
