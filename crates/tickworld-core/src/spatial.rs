//! The 2D grid extension of the stepping engine.
//!
//! A [`Grid`] wraps a [`World`] with width/height bounds, an observer hub,
//! and a seeded random source for default placement. Environments built on a
//! grid implement [`SpatialEnvironment`] and invoke [`grid_hooks!`] inside
//! their [`Environment`] impl, which supplies the store accessors together
//! with the placement hooks:
//!
//! ```text
//! world / world_mut -> Grid::world / Grid::world_mut
//! default_location  -> Grid::random_location
//! check_location    -> Grid::check_location
//! after_add         -> Grid::placed
//! after_delete      -> Grid::removed
//! ```
//!
//! [`grid_hooks!`]: crate::grid_hooks
//!
//! # Determinism
//!
//! The grid's RNG is a [`StdRng`] seeded at construction. Nothing here
//! draws from a process-wide random source, so the same seed always yields
//! the same default placements.

use std::collections::BTreeSet;

use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tickworld_types::{Coord, EntityId, Heading};
use tracing::{debug, info};

use crate::entity::Entity;
use crate::environment::Environment;
use crate::error::WorldError;
use crate::observer::{Observer, ObserverHub};
use crate::world::{KindFilter, World};

/// Result of a movement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The entity now occupies the destination.
    Moved,
    /// The destination was blocked; the entity did not move.
    Bumped,
}

/// Bounded (or unbounded) 2D world with observers.
pub struct Grid<P, A> {
    world: World<P, A>,
    width: i32,
    height: i32,
    bounded: bool,
    walls_built: bool,
    observers: ObserverHub,
    rng: StdRng,
}

impl<P, A> Grid<P, A>
where
    P: fmt::Debug + 'static,
    A: fmt::Debug + 'static,
{
    /// A grid whose entities must stay inside `width` x `height`.
    ///
    /// Non-positive dimensions are raised to 1.
    pub fn bounded(width: i32, height: i32, seed: u64) -> Self {
        Self::build(width, height, true, seed)
    }

    /// A grid that accepts any coordinate. `width` x `height` still drives
    /// default placement.
    pub fn unbounded(width: i32, height: i32, seed: u64) -> Self {
        Self::build(width, height, false, seed)
    }

    fn build(width: i32, height: i32, bounded: bool, seed: u64) -> Self {
        Self {
            world: World::new(),
            width: width.max(1),
            height: height.max(1),
            bounded,
            walls_built: false,
            observers: ObserverHub::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The entity store.
    pub const fn world(&self) -> &World<P, A> {
        &self.world
    }

    /// Mutable access to the entity store.
    pub const fn world_mut(&mut self) -> &mut World<P, A> {
        &mut self.world
    }

    /// Grid width.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Whether placements are confined to the bounds.
    pub const fn is_bounded(&self) -> bool {
        self.bounded
    }

    /// Whether `location` lies within `width` x `height`.
    pub const fn in_bounds(&self, location: Coord) -> bool {
        location.x >= 0 && location.y >= 0 && location.x < self.width && location.y < self.height
    }

    /// Whether an entity may stand on `location` as far as bounds go.
    pub const fn accepts(&self, location: Coord) -> bool {
        !self.bounded || self.in_bounds(location)
    }

    /// Reject placements outside a bounded grid.
    pub fn check_location(&self, location: Coord) -> Result<(), WorldError> {
        if self.accepts(location) {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds {
                location,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// A uniformly random cell within the bounds.
    pub fn random_location(&mut self) -> Coord {
        Coord::new(
            self.rng.random_range(0..self.width),
            self.rng.random_range(0..self.height),
        )
    }

    /// The grid's seeded random source, for environments that need more
    /// randomness than default placement.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Every cell on the border rows and columns, each exactly once.
    pub fn perimeter(&self) -> BTreeSet<Coord> {
        let last_x = self.width.saturating_sub(1);
        let last_y = self.height.saturating_sub(1);
        let mut cells = BTreeSet::new();
        for x in 0..self.width {
            cells.insert(Coord::new(x, 0));
            cells.insert(Coord::new(x, last_y));
        }
        for y in 0..self.height {
            cells.insert(Coord::new(0, y));
            cells.insert(Coord::new(last_x, y));
        }
        cells
    }

    /// Register an observer.
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.subscribe(observer);
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Entities whose squared distance to `location` is at most `radius`².
    pub fn objects_near(&self, location: Coord, radius: i32) -> Vec<&Entity> {
        let radius = i64::from(radius);
        let limit = radius.saturating_mul(radius);
        self.world
            .entities()
            .filter(|e| {
                e.location()
                    .is_some_and(|here| here.distance_squared(location) <= limit)
            })
            .collect()
    }

    /// Move `id` to `destination` unless an obstacle (or, in a bounded grid,
    /// the edge of the world) is in the way.
    ///
    /// A blocked move sets the bump flag and notifies nobody. A successful
    /// move clears the flag and notifies every observer once.
    pub fn move_entity(&mut self, id: EntityId, destination: Coord) -> Result<MoveOutcome, WorldError> {
        let blocked = !self.accepts(destination)
            || self.world.some_objects_at(destination, KindFilter::Obstacle);
        let Self {
            world, observers, ..
        } = self;
        let entity = world.entity_mut(id).ok_or(WorldError::UnknownEntity(id))?;
        entity.set_bump(blocked);
        if blocked {
            debug!(entity = %id, %destination, "Move blocked");
            return Ok(MoveOutcome::Bumped);
        }
        entity.place(Some(destination));
        observers.moved(entity);
        Ok(MoveOutcome::Moved)
    }

    /// `holder` picks up `item`.
    pub fn grab(&mut self, holder: EntityId, item: EntityId) -> Result<(), WorldError> {
        if !self.world.contains(item) {
            return Err(WorldError::UnknownEntity(item));
        }
        self.world
            .entity_mut(holder)
            .ok_or(WorldError::UnknownEntity(holder))?
            .pick_up(item);
        if let Some(held) = self.world.entity_mut(item) {
            held.set_held_by(Some(holder));
        }
        Ok(())
    }

    /// `holder` lets go of `item`. Returns whether it was holding it.
    pub fn release(&mut self, holder: EntityId, item: EntityId) -> Result<bool, WorldError> {
        let released = self
            .world
            .entity_mut(holder)
            .ok_or(WorldError::UnknownEntity(holder))?
            .release(item);
        if released {
            if let Some(held) = self.world.entity_mut(item) {
                held.set_held_by(None);
            }
        }
        Ok(released)
    }

    /// Post-registration step: start with empty hands and announce the
    /// entity to every observer.
    pub fn placed(&mut self, id: EntityId) {
        let Self {
            world, observers, ..
        } = self;
        if let Some(entity) = world.entity_mut(id) {
            entity.clear_carrying();
            observers.added(entity);
        }
    }

    /// Post-removal step: announce the deletion to every observer.
    pub fn removed(&mut self, entity: &Entity) {
        self.observers.deleted(entity);
    }
}

impl<P, A> fmt::Debug for Grid<P, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bounded", &self.bounded)
            .field("walls_built", &self.walls_built)
            .field("observers", &self.observers)
            .field("world", &self.world)
            .finish_non_exhaustive()
    }
}

/// Implements the grid-backed parts of [`Environment`] for a type that
/// keeps its [`Grid`] in the named field.
///
/// Expands, inside an `impl Environment` block, to `world`, `world_mut`,
/// `check_location`, `after_add`, `after_delete`, and `default_location`.
/// Because the store accessors come only from this macro, a grid
/// environment cannot end up with bounds checks or observer notifications
/// missing. Pass `without default_location` to keep a domain-specific
/// placement rule:
///
/// ```ignore
/// impl Environment for Maze {
///     type Percept = Coord;
///     type Action = Heading;
///
///     tickworld_core::grid_hooks!(grid);
///
///     fn percept(&self, agent: EntityId) -> Result<Coord, WorldError> { /* ... */ }
///     fn execute_action(&mut self, agent: EntityId, action: &Heading) -> Result<(), WorldError> { /* ... */ }
/// }
/// ```
#[macro_export]
macro_rules! grid_hooks {
    (@store $grid:ident) => {
        fn world(&self) -> &$crate::World<Self::Percept, Self::Action> {
            self.$grid.world()
        }

        fn world_mut(&mut self) -> &mut $crate::World<Self::Percept, Self::Action> {
            self.$grid.world_mut()
        }

        fn check_location(
            &self,
            location: $crate::types::Coord,
        ) -> ::core::result::Result<(), $crate::WorldError> {
            self.$grid.check_location(location)
        }

        fn after_add(&mut self, id: $crate::types::EntityId) {
            self.$grid.placed(id);
        }

        fn after_delete(&mut self, entity: &$crate::Entity) {
            self.$grid.removed(entity);
        }
    };
    ($grid:ident, without default_location) => {
        $crate::grid_hooks!(@store $grid);
    };
    ($grid:ident) => {
        $crate::grid_hooks!(@store $grid);

        fn default_location(
            &mut self,
            _entity: &$crate::Entity,
        ) -> ::core::option::Option<$crate::types::Coord> {
            ::core::option::Option::Some(self.$grid.random_location())
        }
    };
}

/// An [`Environment`] laid out on a [`Grid`].
///
/// Implementors wire the placement hooks with [`grid_hooks!`].
///
/// [`grid_hooks!`]: crate::grid_hooks
pub trait SpatialEnvironment: Environment {
    /// The grid.
    fn grid(&self) -> &Grid<Self::Percept, Self::Action>;

    /// Mutable access to the grid.
    fn grid_mut(&mut self) -> &mut Grid<Self::Percept, Self::Action>;

    /// Entities within `radius` of `location`.
    fn objects_near(&self, location: Coord, radius: i32) -> Vec<&Entity> {
        self.grid().objects_near(location, radius)
    }

    /// Move an entity, colliding with obstacles.
    fn move_to(&mut self, id: EntityId, destination: Coord) -> Result<MoveOutcome, WorldError> {
        self.grid_mut().move_entity(id, destination)
    }

    /// Register an observer for add/move/delete notifications.
    fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.grid_mut().add_observer(observer);
    }

    /// The heading `increment` steps around the cardinal cycle from
    /// `heading`.
    fn turn_heading(&self, heading: Heading, increment: i32) -> Heading {
        heading.turn(increment)
    }

    /// Put a wall on every border cell. Allowed once per environment.
    ///
    /// Returns the number of walls placed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::WallsAlreadyBuilt`] on a second call.
    fn add_walls(&mut self) -> Result<usize, WorldError>
    where
        Self: Sized,
    {
        if self.grid().walls_built {
            return Err(WorldError::WallsAlreadyBuilt);
        }
        let cells = self.grid().perimeter();
        let count = cells.len();
        for cell in cells {
            self.add_object(Entity::wall(), Some(cell))?;
        }
        self.grid_mut().walls_built = true;
        info!(
            walls = count,
            width = self.grid().width(),
            height = self.grid().height(),
            "Perimeter walls built"
        );
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tickworld_types::EntityKind;

    use super::*;
    use crate::agent::Agent;
    use crate::observer::EventLog;

    /// Minimal spatial world: agents perceive their own location and act
    /// by naming a destination.
    struct Plane {
        grid: Grid<Option<Coord>, Coord>,
    }

    impl Plane {
        fn new(width: i32, height: i32) -> Self {
            Self {
                grid: Grid::bounded(width, height, 7),
            }
        }
    }

    impl Environment for Plane {
        type Percept = Option<Coord>;
        type Action = Coord;

        grid_hooks!(grid);

        fn percept(&self, agent: EntityId) -> Result<Option<Coord>, WorldError> {
            Ok(self
                .world()
                .entity(agent)
                .ok_or(WorldError::UnknownEntity(agent))?
                .location())
        }

        fn execute_action(&mut self, agent: EntityId, action: &Coord) -> Result<(), WorldError> {
            self.move_to(agent, *action).map(|_| ())
        }
    }

    impl SpatialEnvironment for Plane {
        fn grid(&self) -> &Grid<Option<Coord>, Coord> {
            &self.grid
        }

        fn grid_mut(&mut self) -> &mut Grid<Option<Coord>, Coord> {
            &mut self.grid
        }
    }

    /// Spatial world with its own placement rule: everything added without
    /// a location lands in the corner.
    struct Corner {
        grid: Grid<(), ()>,
    }

    impl Environment for Corner {
        type Percept = ();
        type Action = ();

        grid_hooks!(grid, without default_location);

        fn percept(&self, _agent: EntityId) -> Result<(), WorldError> {
            Ok(())
        }

        fn execute_action(&mut self, _agent: EntityId, _action: &()) -> Result<(), WorldError> {
            Ok(())
        }

        fn default_location(&mut self, _entity: &Entity) -> Option<Coord> {
            Some(Coord::new(0, 0))
        }
    }

    impl SpatialEnvironment for Corner {
        fn grid(&self) -> &Grid<(), ()> {
            &self.grid
        }

        fn grid_mut(&mut self) -> &mut Grid<(), ()> {
            &mut self.grid
        }
    }

    fn walker() -> Agent<Option<Coord>, Coord> {
        Agent::new("walker", |p: &Option<Coord>| {
            p.map_or(Coord::new(0, 0), |c| Coord::new(c.x.saturating_add(1), c.y))
        })
    }

    #[test]
    fn walls_cover_the_perimeter_once() {
        let mut env = Plane::new(4, 3);
        let placed = env.add_walls().unwrap();
        // 4 + 4 top/bottom, plus 1 + 1 interior rows on each side.
        assert_eq!(placed, 10);
        assert_eq!(env.world().len(), 10);
        assert!(env.some_objects_at(Coord::new(3, 1), KindFilter::Obstacle));
        assert!(!env.some_objects_at(Coord::new(1, 1), KindFilter::Any));
    }

    #[test]
    fn walls_can_only_be_built_once() {
        let mut env = Plane::new(3, 3);
        env.add_walls().unwrap();
        assert!(matches!(env.add_walls(), Err(WorldError::WallsAlreadyBuilt)));
        assert_eq!(env.world().len(), 8);
    }

    #[test]
    fn degenerate_grid_has_no_duplicate_walls() {
        let mut env = Plane::new(1, 1);
        assert_eq!(env.add_walls().unwrap(), 1);
    }

    #[test]
    fn move_into_free_cell_notifies_once() {
        let mut env = Plane::new(5, 5);
        let log = EventLog::new();
        env.add_observer(Box::new(log.clone()));
        let id = env.add_object(Entity::new(EntityKind::Thing), Some(Coord::new(1, 1))).unwrap();

        let outcome = env.move_to(id, Coord::new(2, 1)).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        let entity = env.world().entity(id).unwrap();
        assert_eq!(entity.location(), Some(Coord::new(2, 1)));
        assert!(!entity.bump());
        assert_eq!(log.move_count(), 1);
    }

    #[test]
    fn move_into_obstacle_bumps_silently() {
        let mut env = Plane::new(5, 5);
        let log = EventLog::new();
        env.add_observer(Box::new(log.clone()));
        env.add_object(Entity::obstacle(), Some(Coord::new(2, 1))).unwrap();
        let id = env.add_object(Entity::new(EntityKind::Thing), Some(Coord::new(1, 1))).unwrap();

        let outcome = env.move_to(id, Coord::new(2, 1)).unwrap();
        assert_eq!(outcome, MoveOutcome::Bumped);
        let entity = env.world().entity(id).unwrap();
        assert_eq!(entity.location(), Some(Coord::new(1, 1)));
        assert!(entity.bump());
        assert_eq!(log.move_count(), 0);
    }

    #[test]
    fn dirt_does_not_block() {
        let mut env = Plane::new(5, 5);
        env.add_object(Entity::dirt(), Some(Coord::new(2, 2))).unwrap();
        let id = env.add_object(Entity::new(EntityKind::Thing), Some(Coord::new(1, 2))).unwrap();
        assert_eq!(env.move_to(id, Coord::new(2, 2)).unwrap(), MoveOutcome::Moved);
    }

    #[test]
    fn leaving_a_bounded_grid_is_a_bump() {
        let mut env = Plane::new(3, 3);
        let id = env.add_object(Entity::new(EntityKind::Thing), Some(Coord::new(0, 0))).unwrap();
        assert_eq!(env.move_to(id, Coord::new(-1, 0)).unwrap(), MoveOutcome::Bumped);
        assert_eq!(env.world().entity(id).unwrap().location(), Some(Coord::new(0, 0)));
    }

    #[test]
    fn unbounded_grid_accepts_any_coordinate() {
        let grid: Grid<(), ()> = Grid::unbounded(3, 3, 1);
        assert!(grid.check_location(Coord::new(-10, 40)).is_ok());
        let bounded: Grid<(), ()> = Grid::bounded(3, 3, 1);
        assert!(matches!(
            bounded.check_location(Coord::new(3, 0)),
            Err(WorldError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn out_of_bounds_placement_is_rejected() {
        let mut env = Plane::new(3, 3);
        let result = env.add_object(Entity::dirt(), Some(Coord::new(5, 5)));
        assert!(matches!(result, Err(WorldError::OutOfBounds { .. })));
        assert!(env.world().is_empty());
    }

    #[test]
    fn default_locations_stay_in_bounds_and_are_seeded() {
        let mut a = Plane::new(4, 6);
        let mut b = Plane::new(4, 6);
        for _ in 0..50 {
            let ia = a.add_object(Entity::dirt(), None).unwrap();
            let ib = b.add_object(Entity::dirt(), None).unwrap();
            let la = a.world().entity(ia).unwrap().location().unwrap();
            let lb = b.world().entity(ib).unwrap().location().unwrap();
            assert!(a.grid().in_bounds(la));
            assert_eq!(la, lb);
        }
    }

    #[test]
    fn placement_is_listed_at_its_cell() {
        let mut env = Plane::new(6, 6);
        for x in 0..6 {
            for y in 0..6 {
                let here = Coord::new(x, y);
                let id = env.add_object(Entity::dirt(), Some(here)).unwrap();
                assert!(env.list_objects_at(here, KindFilter::Any).iter().any(|e| e.id() == id));
            }
        }
    }

    #[test]
    fn objects_near_uses_squared_radius() {
        let mut env = Plane::new(10, 10);
        let centre = Coord::new(5, 5);
        let near = env.add_object(Entity::dirt(), Some(Coord::new(8, 9))).unwrap(); // d² = 25
        let far = env.add_object(Entity::dirt(), Some(Coord::new(9, 9))).unwrap(); // d² = 32

        let found: Vec<EntityId> = env.objects_near(centre, 5).iter().map(|e| e.id()).collect();
        assert!(found.contains(&near));
        assert!(!found.contains(&far));
    }

    #[test]
    fn add_and_delete_are_announced_after_registration() {
        let mut env = Plane::new(4, 4);
        let log = EventLog::new();
        env.add_observer(Box::new(log.clone()));

        let id = env.add_object(Entity::dirt(), Some(Coord::new(1, 1))).unwrap();
        assert!(env.delete_object(id).is_removed());
        // Non-members produce no notification.
        assert!(!env.delete_object(id).is_removed());

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events.first(),
            Some(crate::observer::ObservedEvent::Added { location: Some(_), .. })
        ));
        assert!(matches!(
            events.get(1),
            Some(crate::observer::ObservedEvent::Deleted { .. })
        ));
    }

    #[test]
    fn hooks_keep_custom_default_location() {
        let mut env = Corner {
            grid: Grid::bounded(3, 3, 0),
        };
        let log = EventLog::new();
        env.add_observer(Box::new(log.clone()));

        let id = env.add_object(Entity::dirt(), None).unwrap();
        assert_eq!(env.world().entity(id).unwrap().location(), Some(Coord::new(0, 0)));
        assert!(matches!(
            env.add_object(Entity::dirt(), Some(Coord::new(3, 3))),
            Err(WorldError::OutOfBounds { .. })
        ));
        assert!(env.delete_object(id).is_removed());

        let kinds: Vec<bool> = log
            .events()
            .iter()
            .map(|e| matches!(e, crate::observer::ObservedEvent::Added { .. }))
            .collect();
        assert_eq!(kinds, vec![true, false]);
        assert!(env.world().is_empty());
    }

    #[test]
    fn carried_items_are_released_on_deletion() {
        let mut env = Plane::new(4, 4);
        let carrier = env.add_object(walker(), Some(Coord::new(1, 1))).unwrap();
        let item = env.add_object(Entity::dirt(), Some(Coord::new(1, 1))).unwrap();

        env.grid_mut().grab(carrier, item).unwrap();
        assert_eq!(env.world().entity(carrier).unwrap().holding(), &[item]);
        assert_eq!(env.world().entity(item).unwrap().held_by(), Some(carrier));

        env.delete_object(item);
        assert!(env.world().entity(carrier).unwrap().holding().is_empty());
    }

    #[test]
    fn release_reports_whether_anything_was_held() {
        let mut env = Plane::new(4, 4);
        let carrier = env.add_object(walker(), Some(Coord::new(1, 1))).unwrap();
        let item = env.add_object(Entity::dirt(), Some(Coord::new(1, 1))).unwrap();

        assert!(!env.grid_mut().release(carrier, item).unwrap());
        env.grid_mut().grab(carrier, item).unwrap();
        assert!(env.grid_mut().release(carrier, item).unwrap());
        assert_eq!(env.world().entity(item).unwrap().held_by(), None);
    }

    #[test]
    fn stepping_moves_agents_through_the_grid() {
        let mut env = Plane::new(4, 3);
        env.add_walls().unwrap();
        let id = env.add_object(walker(), Some(Coord::new(1, 1))).unwrap();

        env.step().unwrap();
        assert_eq!(env.world().entity(id).unwrap().location(), Some(Coord::new(2, 1)));
        env.step().unwrap();
        // (3, 1) is a wall.
        let body = env.world().entity(id).unwrap();
        assert_eq!(body.location(), Some(Coord::new(2, 1)));
        assert!(body.bump());
    }

    #[test]
    fn turn_heading_cycles() {
        let env = Plane::new(2, 2);
        let mut heading = Heading::East;
        for _ in 0..4 {
            heading = env.turn_heading(heading, 1);
        }
        assert_eq!(heading, Heading::East);
        assert_eq!(env.turn_heading(Heading::East, -1), Heading::North);
    }
}
