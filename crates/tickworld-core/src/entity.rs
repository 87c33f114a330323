//! Physical things placed in a world.
//!
//! An [`Entity`] is the base record for everything a world contains: walls,
//! dirt, and the bodies of agents alike. Marker subtypes are expressed as an
//! [`EntityKind`] tag rather than separate types.

use tickworld_types::{Coord, EntityId, EntityKind};

/// A physical thing that can appear in an environment.
///
/// An entity is created detached (no location) and becomes world-visible
/// only once an environment places it. After placement its location changes
/// only through movement or deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    label: String,
    kind: EntityKind,
    alive: bool,
    location: Option<Coord>,
    bump: bool,
    holding: Vec<EntityId>,
    held_by: Option<EntityId>,
}

impl Entity {
    /// Create a detached entity of the given kind.
    ///
    /// Agents start alive; every other kind starts inert.
    pub fn new(kind: EntityKind) -> Self {
        Self {
            id: EntityId::new(),
            label: kind.name().to_owned(),
            kind,
            alive: kind == EntityKind::Agent,
            location: None,
            bump: false,
            holding: Vec::new(),
            held_by: None,
        }
    }

    /// A border wall.
    pub fn wall() -> Self {
        Self::new(EntityKind::Wall)
    }

    /// A generic obstacle.
    pub fn obstacle() -> Self {
        Self::new(EntityKind::Obstacle)
    }

    /// A dirt patch.
    pub fn dirt() -> Self {
        Self::new(EntityKind::Dirt)
    }

    /// Replace the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Unique identity.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Display label, used in logs only.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Kind tag.
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Whether the entity is alive.
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the entity alive or dead.
    pub const fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
    }

    /// Current location, `None` while detached.
    pub const fn location(&self) -> Option<Coord> {
        self.location
    }

    /// Whether the last movement attempt was blocked.
    pub const fn bump(&self) -> bool {
        self.bump
    }

    /// Clear the bump flag ahead of a new action.
    pub const fn reset_bump(&mut self) {
        self.bump = false;
    }

    /// Entities this one is carrying.
    pub fn holding(&self) -> &[EntityId] {
        &self.holding
    }

    /// The entity carrying this one, if any.
    pub const fn held_by(&self) -> Option<EntityId> {
        self.held_by
    }

    /// What another agent perceives of this entity: its kind name.
    pub const fn object_percept(&self) -> &'static str {
        self.kind.name()
    }

    pub(crate) const fn place(&mut self, location: Option<Coord>) {
        self.location = location;
    }

    pub(crate) const fn set_bump(&mut self, bump: bool) {
        self.bump = bump;
    }

    pub(crate) fn pick_up(&mut self, other: EntityId) {
        if !self.holding.contains(&other) {
            self.holding.push(other);
        }
    }

    pub(crate) fn release(&mut self, other: EntityId) -> bool {
        let before = self.holding.len();
        self.holding.retain(|held| *held != other);
        self.holding.len() != before
    }

    pub(crate) fn clear_carrying(&mut self) {
        self.holding.clear();
        self.held_by = None;
    }

    pub(crate) const fn set_held_by(&mut self, holder: Option<EntityId>) {
        self.held_by = holder;
    }
}
