//! The entity store behind every environment.
//!
//! A [`World`] keeps one ordered collection of [`Object`]s. Insertion order
//! is significant: it is the iteration order of entity listings and the
//! order in which agents act within a tick. The agent collection is the
//! subset of objects that are agents, so an agent's body and its agent
//! record always share one [`EntityId`].

use core::fmt;

use tickworld_types::{Coord, EntityId, EntityKind};

use crate::agent::Agent;
use crate::entity::Entity;

/// Restricts location queries to a kind or a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    /// Every entity matches.
    Any,
    /// Only entities of exactly this kind.
    Kind(EntityKind),
    /// Only entities that block movement (obstacles and walls).
    Obstacle,
}

impl KindFilter {
    /// Whether `entity` passes the filter.
    pub fn matches(self, entity: &Entity) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(kind) => entity.kind() == kind,
            Self::Obstacle => entity.kind().blocks_movement(),
        }
    }
}

/// Anything that can be added to a world: a passive thing or an agent.
pub enum Object<P, A> {
    /// A passive entity (wall, dirt, obstacle).
    Thing(Entity),
    /// A program-driven agent.
    Agent(Agent<P, A>),
}

impl<P, A> Object<P, A> {
    /// The physical entity, whichever variant this is.
    pub const fn entity(&self) -> &Entity {
        match self {
            Self::Thing(entity) => entity,
            Self::Agent(agent) => agent.body(),
        }
    }

    const fn entity_mut(&mut self) -> &mut Entity {
        match self {
            Self::Thing(entity) => entity,
            Self::Agent(agent) => agent.body_mut(),
        }
    }

    /// The agent record, if this object is an agent.
    pub const fn as_agent(&self) -> Option<&Agent<P, A>> {
        match self {
            Self::Thing(_) => None,
            Self::Agent(agent) => Some(agent),
        }
    }

    const fn as_agent_mut(&mut self) -> Option<&mut Agent<P, A>> {
        match self {
            Self::Thing(_) => None,
            Self::Agent(agent) => Some(agent),
        }
    }
}

impl<P, A> From<Entity> for Object<P, A> {
    fn from(entity: Entity) -> Self {
        Self::Thing(entity)
    }
}

impl<P, A> From<Agent<P, A>> for Object<P, A> {
    fn from(agent: Agent<P, A>) -> Self {
        Self::Agent(agent)
    }
}

impl<P, A> fmt::Debug for Object<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Thing(entity) => f.debug_tuple("Thing").field(entity).finish(),
            Self::Agent(agent) => f.debug_tuple("Agent").field(agent).finish(),
        }
    }
}

/// Outcome of a deletion request.
#[derive(Debug)]
pub enum Removal<P, A> {
    /// The object was a member and has been removed; it is handed back.
    Removed(Object<P, A>),
    /// No object with that id was in the world. Nothing changed.
    NotPresent,
}

impl<P, A> Removal<P, A> {
    /// Whether something was actually removed.
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }
}

/// Ordered store of entities and agents, plus the tick counter.
///
/// Membership changes only inside this crate. Holders of `&mut World` can
/// adjust performance and aliveness but cannot add, remove, or relocate
/// entities.
pub struct World<P, A> {
    objects: Vec<Object<P, A>>,
    tick: u64,
}

impl<P, A> World<P, A>
where
    P: fmt::Debug + 'static,
    A: fmt::Debug + 'static,
{
    /// Create an empty world at tick 0.
    pub const fn new() -> Self {
        Self {
            objects: Vec::new(),
            tick: 0,
        }
    }

    /// Number of completed ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) const fn advance_tick(&mut self) -> u64 {
        self.tick = self.tick.saturating_add(1);
        self.tick
    }

    // -------------------------------------------------------------------
    // Entity view
    // -------------------------------------------------------------------

    /// All entities, agents included, in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.objects.iter().map(Object::entity)
    }

    /// Number of entities (agents included).
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether an entity with this id is a member.
    pub fn contains(&self, id: EntityId) -> bool {
        self.objects.iter().any(|o| o.entity().id() == id)
    }

    /// Look up an entity by id.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.objects.iter().map(Object::entity).find(|e| e.id() == id)
    }

    /// Mutable lookup of an entity by id.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.objects
            .iter_mut()
            .map(Object::entity_mut)
            .find(|e| e.id() == id)
    }

    // -------------------------------------------------------------------
    // Agent view
    // -------------------------------------------------------------------

    /// All agents in registration order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent<P, A>> {
        self.objects.iter().filter_map(Object::as_agent)
    }

    /// Ids of all agents in registration order.
    pub fn agent_ids(&self) -> Vec<EntityId> {
        self.agents().map(Agent::id).collect()
    }

    /// Number of registered agents.
    pub fn agent_count(&self) -> usize {
        self.agents().count()
    }

    /// Number of registered agents that are alive.
    pub fn alive_agent_count(&self) -> usize {
        self.agents().filter(|a| a.is_alive()).count()
    }

    /// Look up an agent by id.
    pub fn agent(&self, id: EntityId) -> Option<&Agent<P, A>> {
        self.agents().find(|a| a.id() == id)
    }

    /// Mutable lookup of an agent by id.
    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut Agent<P, A>> {
        self.objects
            .iter_mut()
            .filter_map(Object::as_agent_mut)
            .find(|a| a.id() == id)
    }

    // -------------------------------------------------------------------
    // Location queries
    // -------------------------------------------------------------------

    /// Entities exactly at `location` that pass `filter`, in insertion order.
    pub fn list_objects_at(&self, location: Coord, filter: KindFilter) -> Vec<&Entity> {
        self.entities()
            .filter(|e| e.location() == Some(location) && filter.matches(e))
            .collect()
    }

    /// Whether any entity at `location` passes `filter`.
    pub fn some_objects_at(&self, location: Coord, filter: KindFilter) -> bool {
        self.entities()
            .any(|e| e.location() == Some(location) && filter.matches(e))
    }

    /// `(label, location)` for every entity, in insertion order.
    pub fn describe(&self) -> Vec<(String, Option<Coord>)> {
        self.entities()
            .map(|e| (e.label().to_owned(), e.location()))
            .collect()
    }

    /// `(label, location)` for every agent, in registration order.
    pub fn describe_agents(&self) -> Vec<(String, Option<Coord>)> {
        self.agents()
            .map(|a| (a.body().label().to_owned(), a.body().location()))
            .collect()
    }

    // -------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------

    /// Place and register an object.
    ///
    /// Agents are enrolled on the way in: performance resets to zero and the
    /// tracer is installed around their program. Callers outside the crate
    /// go through `Environment::add_object`, which checks the location and
    /// notifies observers.
    pub(crate) fn insert(&mut self, object: impl Into<Object<P, A>>, location: Option<Coord>) -> EntityId {
        let mut object = match object.into() {
            Object::Agent(agent) => Object::Agent(agent.enroll()),
            thing @ Object::Thing(_) => thing,
        };
        object.entity_mut().place(location);
        let id = object.entity().id();
        self.objects.push(object);
        id
    }

    /// Remove an object by id.
    ///
    /// Carriers that were holding the removed entity let go of it.
    pub(crate) fn remove(&mut self, id: EntityId) -> Removal<P, A> {
        let Some(index) = self.objects.iter().position(|o| o.entity().id() == id) else {
            return Removal::NotPresent;
        };
        let object = self.objects.remove(index);
        for other in &mut self.objects {
            let entity = other.entity_mut();
            entity.release(id);
            if entity.held_by() == Some(id) {
                entity.set_held_by(None);
            }
        }
        Removal::Removed(object)
    }
}

impl<P, A> Default for World<P, A>
where
    P: fmt::Debug + 'static,
    A: fmt::Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P, A> fmt::Debug for World<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("tick", &self.tick)
            .field("objects", &self.objects)
            .finish()
    }
}
