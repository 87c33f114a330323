//! Side-by-side evaluation of agent programs.
//!
//! Every agent is scored on the same `n` environments. Instance `i` is
//! built from seed `base_seed + i`, and each agent gets its own freshly
//! built copy of every instance, so no two runs share mutable state and all
//! agents face identical starting worlds.
//!
//! The agent placed in an instance is built from [`agent_seed`] of the
//! instance seed, never the instance seed itself, so a randomized program
//! does not replay the stream that laid out its world.

use serde::Serialize;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::environment::Environment;
use crate::error::WorldError;

/// Errors raised by the comparison harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The harness was asked to average over zero instances.
    #[error("comparison needs at least one environment instance")]
    NoInstances,

    /// Building or running an instance failed.
    #[error("instance failed: {0}")]
    World(#[from] WorldError),
}

/// Mixed into an instance seed to derive the seed of the agent placed in it.
pub const AGENT_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for the agent placed in the instance built from `instance_seed`.
pub const fn agent_seed(instance_seed: u64) -> u64 {
    instance_seed ^ AGENT_SEED_SALT
}

/// Builds a fresh agent from a seed.
pub struct AgentFactory<P, A> {
    name: String,
    make: Box<dyn Fn(u64) -> Agent<P, A>>,
}

impl<P, A> AgentFactory<P, A> {
    /// Name a factory closure.
    pub fn new(name: impl Into<String>, make: impl Fn(u64) -> Agent<P, A> + 'static) -> Self {
        Self {
            name: name.into(),
            make: Box::new(make),
        }
    }

    /// Display name used in the report.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build one agent.
    pub fn build(&self, seed: u64) -> Agent<P, A> {
        (self.make)(seed)
    }
}

impl<P, A> core::fmt::Debug for AgentFactory<P, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AgentFactory")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Mean performance of one agent factory across all instances.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentScore {
    /// Factory name.
    pub name: String,
    /// Arithmetic mean of the final performances.
    pub mean: f64,
}

/// Run one agent per instance and return the mean final performance.
///
/// # Errors
///
/// Returns [`HarnessError::NoInstances`] if `instances` is zero, or the
/// first [`WorldError`] raised while building or running an instance.
pub fn test_agent<E, F>(
    env_factory: F,
    agent: &AgentFactory<E::Percept, E::Action>,
    instances: usize,
    steps: u64,
    base_seed: u64,
) -> Result<f64, HarnessError>
where
    E: Environment,
    F: Fn(u64) -> Result<E, WorldError>,
{
    if instances == 0 {
        return Err(HarnessError::NoInstances);
    }

    let mut total: i128 = 0;
    for seed in instance_seeds(base_seed, instances) {
        let mut env = env_factory(seed)?;
        let id = env.add_object(agent.build(agent_seed(seed)), None)?;
        env.run(steps)?;
        let performance = env
            .world()
            .agent(id)
            .ok_or(WorldError::NotAnAgent(id))?
            .performance();
        debug!(agent = agent.name(), seed, performance, "Instance scored");
        total = total.saturating_add(i128::from(performance));
    }

    Ok(mean(total, instances))
}

/// Score every factory on the same `instances` environments.
///
/// Results come back in factory order.
///
/// # Errors
///
/// Returns [`HarnessError::NoInstances`] if `instances` is zero, or the
/// first [`WorldError`] raised by any run.
pub fn compare_agents<E, F>(
    env_factory: F,
    agents: &[AgentFactory<E::Percept, E::Action>],
    instances: usize,
    steps: u64,
    base_seed: u64,
) -> Result<Vec<AgentScore>, HarnessError>
where
    E: Environment,
    F: Fn(u64) -> Result<E, WorldError>,
{
    if instances == 0 {
        return Err(HarnessError::NoInstances);
    }
    info!(
        agents = agents.len(),
        instances, steps, base_seed, "Comparing agents"
    );

    let mut scores = Vec::with_capacity(agents.len());
    for agent in agents {
        let mean = test_agent(&env_factory, agent, instances, steps, base_seed)?;
        info!(agent = agent.name(), mean, "Agent scored");
        scores.push(AgentScore {
            name: agent.name().to_owned(),
            mean,
        });
    }
    Ok(scores)
}

fn instance_seeds(base_seed: u64, instances: usize) -> impl Iterator<Item = u64> {
    (0..instances).map(move |i| base_seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX)))
}

#[allow(clippy::cast_precision_loss)]
fn mean(total: i128, count: usize) -> f64 {
    total as f64 / count as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tickworld_types::EntityId;

    use super::*;
    use crate::world::World;

    /// Every agent earns its seed's value (mod 10) per step.
    struct SeedWorld {
        world: World<u64, i64>,
        seed: u64,
    }

    impl Environment for SeedWorld {
        type Percept = u64;
        type Action = i64;

        fn world(&self) -> &World<u64, i64> {
            &self.world
        }

        fn world_mut(&mut self) -> &mut World<u64, i64> {
            &mut self.world
        }

        fn percept(&self, _agent: EntityId) -> Result<u64, WorldError> {
            Ok(self.seed % 10)
        }

        fn execute_action(&mut self, agent: EntityId, action: &i64) -> Result<(), WorldError> {
            self.world
                .agent_mut(agent)
                .ok_or(WorldError::NotAnAgent(agent))?
                .add_performance(*action);
            Ok(())
        }
    }

    fn seed_world(seed: u64) -> Result<SeedWorld, WorldError> {
        Ok(SeedWorld {
            world: World::new(),
            seed,
        })
    }

    fn earner() -> AgentFactory<u64, i64> {
        AgentFactory::new("earner", |_seed| {
            Agent::new("earner", |p: &u64| i64::try_from(*p).unwrap_or(0))
        })
    }

    fn idler() -> AgentFactory<u64, i64> {
        AgentFactory::new("idler", |_seed| Agent::new("idler", |_: &u64| 0))
    }

    #[test]
    fn mean_is_exact() {
        // Seeds 3, 4, 5 earn 3, 4, 5 per step; 2 steps each: 6 + 8 + 10.
        let mean = test_agent(seed_world, &earner(), 3, 2, 3).unwrap();
        assert!((mean - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn scores_follow_factory_order() {
        let scores = compare_agents(seed_world, &[earner(), idler()], 4, 1, 0).unwrap();
        let names: Vec<&str> = scores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["earner", "idler"]);
        // Seeds 0..4 earn 0 + 1 + 2 + 3 = 6 over 4 instances.
        let means: Vec<f64> = scores.iter().map(|s| s.mean).collect();
        assert_eq!(means, vec![1.5, 0.0]);
    }

    #[test]
    fn zero_instances_is_rejected() {
        assert!(matches!(
            compare_agents(seed_world, &[earner()], 0, 10, 0),
            Err(HarnessError::NoInstances)
        ));
        assert!(matches!(
            test_agent(seed_world, &earner(), 0, 10, 0),
            Err(HarnessError::NoInstances)
        ));
    }

    #[test]
    fn factory_errors_propagate() {
        let failing = |_seed: u64| -> Result<SeedWorld, WorldError> {
            Err(WorldError::WallsAlreadyBuilt)
        };
        assert!(matches!(
            compare_agents(failing, &[earner()], 2, 1, 0),
            Err(HarnessError::World(WorldError::WallsAlreadyBuilt))
        ));
    }

    #[test]
    fn agents_are_seeded_apart_from_their_instance() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        let recorder = AgentFactory::new("recorder", move |seed| {
            sink.borrow_mut().push(seed);
            Agent::new("recorder", |_: &u64| 0)
        });

        test_agent(seed_world, &recorder, 3, 1, 40).unwrap();

        let seeds = received.borrow().clone();
        assert_eq!(seeds, vec![agent_seed(40), agent_seed(41), agent_seed(42)]);
        for (instance, seed) in (40..43).zip(&seeds) {
            assert_ne!(instance, *seed);
        }
    }

    #[test]
    fn agent_seed_draws_a_different_stream() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut world_rng = StdRng::seed_from_u64(5);
        let mut agent_rng = StdRng::seed_from_u64(agent_seed(5));
        let world_draws: Vec<u32> = (0..5).map(|_| world_rng.random()).collect();
        let agent_draws: Vec<u32> = (0..5).map(|_| agent_rng.random()).collect();
        assert_ne!(world_draws, agent_draws);
    }

    #[test]
    fn scores_serialize_as_json() {
        let score = AgentScore {
            name: String::from("earner"),
            mean: 2.5,
        };
        let json = serde_json::to_value(&score).unwrap();
        assert_eq!(json["name"], "earner");
        assert_eq!(json["mean"], 2.5);
    }
}
