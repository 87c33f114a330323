//! Publish/subscribe channel for entity lifecycle events.
//!
//! Observers are notified synchronously, in registration order, whenever a
//! spatial environment adds, moves, or deletes an entity. A callback only
//! receives the entity; it has no handle on the environment, so it cannot
//! mutate the world from inside a notification.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tickworld_types::{Coord, EntityId, EntityKind};
use tracing::{debug, info};

use crate::entity::Entity;

/// A sink for entity add/move/delete notifications.
pub trait Observer {
    /// An entity was placed into the world.
    fn object_added(&mut self, entity: &Entity);

    /// An entity moved to a new cell.
    fn object_moved(&mut self, entity: &Entity);

    /// An entity was removed from the world.
    fn object_deleted(&mut self, entity: &Entity);
}

/// Ordered list of registered observers.
#[derive(Default)]
pub struct ObserverHub {
    observers: Vec<Box<dyn Observer>>,
}

impl ObserverHub {
    /// Create a hub with no observers.
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Register an observer. It is notified after all earlier observers.
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn added(&mut self, entity: &Entity) {
        for observer in &mut self.observers {
            observer.object_added(entity);
        }
    }

    pub(crate) fn moved(&mut self, entity: &Entity) {
        for observer in &mut self.observers {
            observer.object_moved(entity);
        }
    }

    pub(crate) fn deleted(&mut self, entity: &Entity) {
        for observer in &mut self.observers {
            observer.object_deleted(entity);
        }
    }
}

impl core::fmt::Debug for ObserverHub {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObserverHub")
            .field("observers", &self.observers.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Bundled observers
// ---------------------------------------------------------------------------

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ObservedEvent {
    /// An entity was added.
    Added {
        /// The entity.
        id: EntityId,
        /// Its kind.
        kind: EntityKind,
        /// Where it was placed.
        location: Option<Coord>,
    },
    /// An entity moved.
    Moved {
        /// The entity.
        id: EntityId,
        /// Its new cell.
        location: Option<Coord>,
    },
    /// An entity was deleted.
    Deleted {
        /// The entity.
        id: EntityId,
        /// Its kind.
        kind: EntityKind,
    },
}

/// Records every notification into a shared buffer.
///
/// Clones share the buffer, so a caller can keep one handle and register
/// the other with an environment.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ObservedEvent>>>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.borrow().clone()
    }

    /// Number of recorded move notifications.
    pub fn move_count(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, ObservedEvent::Moved { .. }))
            .count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn record(&self, event: ObservedEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Observer for EventLog {
    fn object_added(&mut self, entity: &Entity) {
        self.record(ObservedEvent::Added {
            id: entity.id(),
            kind: entity.kind(),
            location: entity.location(),
        });
    }

    fn object_moved(&mut self, entity: &Entity) {
        self.record(ObservedEvent::Moved {
            id: entity.id(),
            location: entity.location(),
        });
    }

    fn object_deleted(&mut self, entity: &Entity) {
        self.record(ObservedEvent::Deleted {
            id: entity.id(),
            kind: entity.kind(),
        });
    }
}

/// Logs every notification through `tracing`.
///
/// Placement of walls is logged at `DEBUG` to keep startup quiet; everything
/// else at `INFO`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn object_added(&mut self, entity: &Entity) {
        if entity.kind() == EntityKind::Wall {
            debug!(id = %entity.id(), location = ?entity.location(), "Wall placed");
        } else {
            info!(
                id = %entity.id(),
                label = entity.label(),
                location = ?entity.location(),
                "Object added"
            );
        }
    }

    fn object_moved(&mut self, entity: &Entity) {
        info!(
            id = %entity.id(),
            label = entity.label(),
            location = ?entity.location(),
            "Object moved"
        );
    }

    fn object_deleted(&mut self, entity: &Entity) {
        info!(
            id = %entity.id(),
            label = entity.label(),
            location = ?entity.location(),
            "Object deleted"
        );
    }
}
