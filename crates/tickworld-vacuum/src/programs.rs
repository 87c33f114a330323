//! Toy agent programs for the vacuum world.
//!
//! Every program that uses randomness owns a [`StdRng`] seeded at
//! construction, so two agents built from the same seed behave identically.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tickworld_core::{Agent, AgentProgram};
use tickworld_types::{Cleanliness, Coord, VacuumAction, VacuumPercept};

use crate::error::VacuumError;

/// An agent in the vacuum world.
pub type VacuumAgent = Agent<VacuumPercept, VacuumAction>;

/// Left-hand square of the classic two-square world.
pub const LOCATION_A: Coord = Coord::new(1, 1);

/// Right-hand square of the classic two-square world.
pub const LOCATION_B: Coord = Coord::new(2, 1);

/// Actions available to [`random_vacuum_agent`].
pub const RANDOM_VACUUM_ACTIONS: [VacuumAction; 4] = [
    VacuumAction::Right,
    VacuumAction::Left,
    VacuumAction::Suck,
    VacuumAction::NoOp,
];

// ---------------------------------------------------------------------------
// Random
// ---------------------------------------------------------------------------

/// Picks uniformly among a fixed set of actions, ignoring the percept.
#[derive(Debug, Clone)]
pub struct RandomAgent<A> {
    actions: Vec<A>,
    fallback: A,
    rng: StdRng,
}

impl<A: Clone> RandomAgent<A> {
    /// Build a random program over `actions`.
    ///
    /// # Errors
    ///
    /// Returns [`VacuumError::NoActions`] if `actions` is empty.
    pub fn new(actions: Vec<A>, seed: u64) -> Result<Self, VacuumError> {
        let fallback = actions.first().cloned().ok_or(VacuumError::NoActions)?;
        Ok(Self {
            actions,
            fallback,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// The actions this program chooses from.
    pub fn actions(&self) -> &[A] {
        &self.actions
    }
}

impl<P, A: Clone> AgentProgram<P, A> for RandomAgent<A> {
    fn decide(&mut self, _percept: &P) -> A {
        self.actions
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// A random agent over `Right`, `Left`, `Suck` and `NoOp`.
pub fn random_vacuum_agent(seed: u64) -> VacuumAgent {
    let program = RandomAgent {
        actions: RANDOM_VACUUM_ACTIONS.to_vec(),
        fallback: VacuumAction::NoOp,
        rng: StdRng::seed_from_u64(seed),
    };
    Agent::new("RandomVacuumAgent", program)
}

// ---------------------------------------------------------------------------
// Reflex
// ---------------------------------------------------------------------------

/// The two-square reflex rule: suck if dirty, otherwise shuttle between A
/// and B.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflexVacuumProgram;

impl AgentProgram<VacuumPercept, VacuumAction> for ReflexVacuumProgram {
    fn decide(&mut self, percept: &VacuumPercept) -> VacuumAction {
        if percept.status == Cleanliness::Dirty {
            VacuumAction::Suck
        } else if percept.location == LOCATION_A {
            VacuumAction::Right
        } else if percept.location == LOCATION_B {
            VacuumAction::Left
        } else {
            VacuumAction::NoOp
        }
    }
}

/// An agent running [`ReflexVacuumProgram`].
pub fn reflex_vacuum_agent() -> VacuumAgent {
    Agent::new("ReflexVacuumAgent", ReflexVacuumProgram)
}

// ---------------------------------------------------------------------------
// Simple reflex
// ---------------------------------------------------------------------------

/// Sucks when dirty, otherwise wanders in a random direction.
#[derive(Debug, Clone)]
pub struct SimpleReflexProgram {
    rng: StdRng,
}

impl SimpleReflexProgram {
    /// Seed the wandering.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl AgentProgram<VacuumPercept, VacuumAction> for SimpleReflexProgram {
    fn decide(&mut self, percept: &VacuumPercept) -> VacuumAction {
        if percept.status == Cleanliness::Dirty {
            return VacuumAction::Suck;
        }
        VacuumAction::MOVES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(VacuumAction::NoOp)
    }
}

/// An agent running [`SimpleReflexProgram`].
pub fn simple_reflex_agent(seed: u64) -> VacuumAgent {
    Agent::new("SimpleReflexAgent", SimpleReflexProgram::new(seed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const fn percept(status: Cleanliness, x: i32, y: i32) -> VacuumPercept {
        VacuumPercept {
            status,
            location: Coord::new(x, y),
        }
    }

    #[test]
    fn reflex_rules() {
        let mut program = ReflexVacuumProgram;
        assert_eq!(program.decide(&percept(Cleanliness::Dirty, 5, 5)), VacuumAction::Suck);
        assert_eq!(program.decide(&percept(Cleanliness::Clean, 1, 1)), VacuumAction::Right);
        assert_eq!(program.decide(&percept(Cleanliness::Clean, 2, 1)), VacuumAction::Left);
        assert_eq!(program.decide(&percept(Cleanliness::Clean, 3, 3)), VacuumAction::NoOp);
    }

    #[test]
    fn simple_reflex_sucks_or_moves() {
        let mut program = SimpleReflexProgram::new(3);
        assert_eq!(program.decide(&percept(Cleanliness::Dirty, 1, 1)), VacuumAction::Suck);
        for _ in 0..50 {
            let action = program.decide(&percept(Cleanliness::Clean, 1, 1));
            assert!(VacuumAction::MOVES.contains(&action));
        }
    }

    #[test]
    fn random_agent_is_reproducible() {
        let mut a = RandomAgent::new(VacuumAction::ALL.to_vec(), 11).unwrap();
        let mut b = RandomAgent::new(VacuumAction::ALL.to_vec(), 11).unwrap();
        let p = percept(Cleanliness::Clean, 1, 1);
        for _ in 0..100 {
            let action: VacuumAction = a.decide(&p);
            assert_eq!(action, b.decide(&p));
        }
    }

    #[test]
    fn random_agent_stays_in_its_vocabulary() {
        let mut agent = random_vacuum_agent(5);
        let p = percept(Cleanliness::Dirty, 1, 1);
        for _ in 0..100 {
            assert!(RANDOM_VACUUM_ACTIONS.contains(&agent.decide(&p)));
        }
    }

    #[test]
    fn random_agent_needs_actions() {
        let result = RandomAgent::<VacuumAction>::new(Vec::new(), 1);
        assert!(matches!(result, Err(VacuumError::NoActions)));
    }

    #[test]
    fn factories_label_agents() {
        assert_eq!(reflex_vacuum_agent().body().label(), "ReflexVacuumAgent");
        assert_eq!(simple_reflex_agent(1).body().label(), "SimpleReflexAgent");
        assert_eq!(random_vacuum_agent(1).body().label(), "RandomVacuumAgent");
    }
}
