//! Seeded construction of dirty vacuum worlds.

use rand::Rng;
use tickworld_core::config::SimulationConfig;
use tickworld_core::{SpatialEnvironment, WorldError};
use tracing::debug;

use crate::environment::VacuumEnvironment;

/// Builds walled vacuum worlds with dirt scattered over the interior.
///
/// The same seed always produces the same dirt layout and the same default
/// placements, which is what lets the comparison harness give every agent
/// an identical set of worlds.
#[derive(Debug, Clone, PartialEq)]
pub struct VacuumWorldBuilder {
    width: i32,
    height: i32,
    dirt_probability: f64,
}

impl VacuumWorldBuilder {
    /// A builder for `width` x `height` worlds with no dirt.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            dirt_probability: 0.0,
        }
    }

    /// A builder using the `world` and `vacuum` config sections.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.world.width, config.world.height)
            .with_dirt_probability(config.vacuum.dirt_probability)
    }

    /// Set the chance that each interior cell starts dirty.
    ///
    /// Values are clamped to `[0, 1]`; `NaN` means no dirt.
    #[must_use]
    pub fn with_dirt_probability(mut self, probability: f64) -> Self {
        self.dirt_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    /// Grid width.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Chance that an interior cell starts dirty.
    pub const fn dirt_probability(&self) -> f64 {
        self.dirt_probability
    }

    /// Build one world from `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if walls or dirt cannot be placed.
    pub fn build(&self, seed: u64) -> Result<VacuumEnvironment, WorldError> {
        let mut env = VacuumEnvironment::new(self.width, self.height, seed)?;
        let cells = env.interior();
        let mut dirty = Vec::new();
        for cell in cells {
            if env.grid_mut().rng().random_bool(self.dirt_probability) {
                dirty.push(cell);
            }
        }
        for cell in &dirty {
            env.add_dirt(*cell)?;
        }
        debug!(seed, dirt = dirty.len(), "Dirt scattered");
        Ok(env)
    }

    /// A seeded environment factory for the comparison harness.
    pub fn factory(&self) -> impl Fn(u64) -> Result<VacuumEnvironment, WorldError> + use<> {
        let builder = self.clone();
        move |seed| builder.build(seed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tickworld_core::Environment;
    use tickworld_types::{Coord, EntityKind};

    use super::*;

    fn dirt_cells(env: &VacuumEnvironment) -> Vec<Coord> {
        env.world()
            .entities()
            .filter(|e| e.kind() == EntityKind::Dirt)
            .filter_map(|e| e.location())
            .collect()
    }

    #[test]
    fn same_seed_same_layout() {
        let builder = VacuumWorldBuilder::new(8, 8).with_dirt_probability(0.5);
        let a = builder.build(17).unwrap();
        let b = builder.build(17).unwrap();
        assert_eq!(dirt_cells(&a), dirt_cells(&b));
    }

    #[test]
    fn certain_dirt_covers_the_interior() {
        let env = VacuumWorldBuilder::new(5, 4)
            .with_dirt_probability(1.0)
            .build(3)
            .unwrap();
        assert_eq!(dirt_cells(&env), env.interior());
        assert_eq!(env.dirt_count(), 6);
    }

    #[test]
    fn probability_is_clamped() {
        assert!(VacuumWorldBuilder::new(3, 3)
            .with_dirt_probability(f64::NAN)
            .dirt_probability()
            .abs()
            < f64::EPSILON);
        let env = VacuumWorldBuilder::new(4, 4)
            .with_dirt_probability(7.5)
            .build(1)
            .unwrap();
        assert_eq!(env.dirt_count(), 4);
        let env = VacuumWorldBuilder::new(4, 4)
            .with_dirt_probability(-1.0)
            .build(1)
            .unwrap();
        assert_eq!(env.dirt_count(), 0);
    }

    #[test]
    fn builds_from_config() {
        let config = SimulationConfig::parse("world:\n  width: 6\n  height: 5\nvacuum:\n  dirt_probability: 1.0\n")
            .unwrap();
        let env = VacuumWorldBuilder::from_config(&config).build(0).unwrap();
        assert_eq!(env.grid().width(), 6);
        assert_eq!(env.dirt_count(), 12);
    }
}
