//! Object classes a user may place into a vacuum world.

use core::fmt;
use core::str::FromStr;

use tickworld_core::{AgentFactory, Entity, Object};
use tickworld_types::{EntityKind, ObjectClass, VacuumAction, VacuumPercept};

use crate::error::VacuumError;
use crate::programs::{random_vacuum_agent, reflex_vacuum_agent, simple_reflex_agent};

/// Everything that can be instantiated into a vacuum world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VacuumClass {
    /// A wall segment.
    Wall,
    /// A dirt patch.
    Dirt,
    /// The two-square reflex agent.
    ReflexVacuumAgent,
    /// A random agent over `Right`, `Left`, `Suck`, `NoOp`.
    RandomVacuumAgent,
    /// Sucks when dirty, wanders otherwise.
    SimpleReflexAgent,
}

impl VacuumClass {
    /// Every class, in listing order.
    pub const ALL: [Self; 5] = [
        Self::Wall,
        Self::Dirt,
        Self::ReflexVacuumAgent,
        Self::RandomVacuumAgent,
        Self::SimpleReflexAgent,
    ];

    /// The agent classes, in listing order.
    pub const AGENTS: [Self; 3] = [
        Self::ReflexVacuumAgent,
        Self::RandomVacuumAgent,
        Self::SimpleReflexAgent,
    ];

    /// Class name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wall => "Wall",
            Self::Dirt => "Dirt",
            Self::ReflexVacuumAgent => "ReflexVacuumAgent",
            Self::RandomVacuumAgent => "RandomVacuumAgent",
            Self::SimpleReflexAgent => "SimpleReflexAgent",
        }
    }

    /// Kind of the entities this class produces.
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Wall => EntityKind::Wall,
            Self::Dirt => EntityKind::Dirt,
            Self::ReflexVacuumAgent | Self::RandomVacuumAgent | Self::SimpleReflexAgent => {
                EntityKind::Agent
            }
        }
    }

    /// Metadata for presentation layers.
    pub fn object_class(self) -> ObjectClass {
        ObjectClass::new(self.name(), self.kind())
    }

    /// Build a new, unplaced instance. `seed` feeds randomized programs.
    pub fn instantiate(self, seed: u64) -> Object<VacuumPercept, VacuumAction> {
        match self {
            Self::Wall => Entity::wall().into(),
            Self::Dirt => Entity::dirt().into(),
            Self::ReflexVacuumAgent => reflex_vacuum_agent().into(),
            Self::RandomVacuumAgent => random_vacuum_agent(seed).into(),
            Self::SimpleReflexAgent => simple_reflex_agent(seed).into(),
        }
    }

    /// A harness factory for an agent class, `None` for passive classes.
    pub fn agent_factory(self) -> Option<AgentFactory<VacuumPercept, VacuumAction>> {
        let factory = match self {
            Self::Wall | Self::Dirt => return None,
            Self::ReflexVacuumAgent => AgentFactory::new(self.name(), |_seed| reflex_vacuum_agent()),
            Self::RandomVacuumAgent => AgentFactory::new(self.name(), random_vacuum_agent),
            Self::SimpleReflexAgent => AgentFactory::new(self.name(), simple_reflex_agent),
        };
        Some(factory)
    }
}

impl fmt::Display for VacuumClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VacuumClass {
    type Err = VacuumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| VacuumError::UnknownClass(s.to_owned()))
    }
}

/// Harness factories for every agent class.
pub fn agent_factories() -> Vec<AgentFactory<VacuumPercept, VacuumAction>> {
    VacuumClass::AGENTS
        .into_iter()
        .filter_map(VacuumClass::agent_factory)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn instances_have_the_class_kind() {
        for class in VacuumClass::ALL {
            let object = class.instantiate(1);
            assert_eq!(object.entity().kind(), class.kind());
            assert_eq!(object.as_agent().is_some(), class.object_class().is_agent());
        }
    }

    #[test]
    fn names_round_trip() {
        for class in VacuumClass::ALL {
            assert_eq!(class.to_string().parse::<VacuumClass>().unwrap(), class);
        }
        assert!(matches!(
            "Vacuum".parse::<VacuumClass>(),
            Err(VacuumError::UnknownClass(_))
        ));
    }

    #[test]
    fn one_factory_per_agent_class() {
        let names: Vec<String> = agent_factories()
            .iter()
            .map(|f| f.name().to_owned())
            .collect();
        assert_eq!(
            names,
            vec!["ReflexVacuumAgent", "RandomVacuumAgent", "SimpleReflexAgent"]
        );
        assert!(VacuumClass::Dirt.agent_factory().is_none());
    }
}
