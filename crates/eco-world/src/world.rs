//! Bounded 2D grid holding every entity in the simulation.

use crate::entity::{Creature, Entity, EntityFilter};
use eco_core::{EntityId, EntityKind, Error, Point, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Authoritative spatial index of entities.
///
/// Entity records live in an arena addressed by [`EntityId`]. A record stays
/// in the arena after removal so undo can put it back; only the binding to a
/// point is dropped. Iteration follows handle order, which is creation order.
///
/// The arena only grows: every spawn allocates a record, and records freed by
/// undo are not reclaimed. Memory is bounded by the number of entities ever
/// created, the same growth profile as the undo history.
#[derive(Debug, Clone)]
pub struct World {
    width: i32,
    height: i32,
    entities: Vec<Entity>,
    positions: BTreeMap<EntityId, Point>,
    occupied: HashMap<Point, EntityId>,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            entities: Vec::new(),
            positions: BTreeMap::new(),
            occupied: HashMap::new(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Store a new record without placing it
    pub fn create(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u64);
        self.entities.push(entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities
            .get(id.0 as usize)
            .ok_or(Error::EntityNotFound(id))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(id.0 as usize)
            .ok_or(Error::EntityNotFound(id))
    }

    pub fn creature(&self, id: EntityId) -> Result<&Creature> {
        self.entity(id)?
            .creature()
            .ok_or_else(|| Error::InvalidState(format!("Entity {} is not a creature", id)))
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Result<&mut Creature> {
        self.entity_mut(id)?
            .creature_mut()
            .ok_or_else(|| Error::InvalidState(format!("Entity {} is not a creature", id)))
    }

    /// Place `id` at `point`, moving it if it is already placed elsewhere.
    pub fn add(&mut self, point: Point, id: EntityId) -> Result<()> {
        if !self.contains(point) {
            return Err(Error::OutOfBounds(point));
        }
        self.entity(id)?;

        match self.occupied.get(&point) {
            Some(&holder) if holder == id => return Ok(()),
            Some(_) => return Err(Error::PointOccupied(point)),
            None => {}
        }

        if let Some(previous) = self.positions.insert(id, point) {
            self.occupied.remove(&previous);
        }
        self.occupied.insert(point, id);
        Ok(())
    }

    /// Unbind `id` from its point
    pub fn remove(&mut self, id: EntityId) -> Result<()> {
        let point = self.positions.remove(&id).ok_or(Error::EntityNotFound(id))?;
        self.occupied.remove(&point);
        Ok(())
    }

    pub fn get_position(&self, id: EntityId) -> Result<Point> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(Error::EntityNotFound(id))
    }

    /// Whether `id` currently occupies a point
    pub fn is_placed(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    pub fn get_entities(&self, filter: impl Into<EntityFilter>) -> Vec<(Point, EntityId)> {
        let filter = filter.into();
        self.positions
            .iter()
            .filter(|(id, _)| {
                self.entities
                    .get(id.0 as usize)
                    .is_some_and(|entity| filter.matches(entity))
            })
            .map(|(&id, &point)| (point, id))
            .collect()
    }

    pub fn get_all(&self) -> Vec<(Point, EntityId)> {
        self.get_entities(EntityFilter::All)
    }

    pub fn entity_at(&self, point: Point) -> Option<EntityId> {
        self.occupied.get(&point).copied()
    }

    /// Bounds check
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn is_used(&self, point: Point) -> bool {
        self.occupied.contains_key(&point)
    }

    /// In bounds and unoccupied
    pub fn is_free(&self, point: Point) -> bool {
        self.contains(point) && !self.is_used(point)
    }

    /// Number of placed entities
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn free_cell_count(&self) -> usize {
        (self.width.max(0) as usize * self.height.max(0) as usize).saturating_sub(self.len())
    }

    /// Unoccupied points in row-major order
    pub fn free_cells(&self) -> Vec<Point> {
        let mut cells = Vec::with_capacity(self.free_cell_count());
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if !self.is_used(point) {
                    cells.push(point);
                }
            }
        }
        cells
    }

    /// Snapshot of every binding, for comparing world states
    pub fn bindings(&self) -> BTreeMap<EntityId, Point> {
        self.positions.clone()
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for id in self.positions.keys() {
            if let Some(entity) = self.entities.get(id.0 as usize) {
                *census.counts.entry(entity.kind()).or_insert(0) += 1;
            }
        }
        census
    }
}

/// Population per species
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub counts: BTreeMap<EntityKind, usize>,
}

impl Census {
    pub fn get(&self, kind: EntityKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_world_creation() {
        let world = World::new(10, 5);
        assert_eq!(world.width(), 10);
        assert_eq!(world.height(), 5);
        assert!(world.is_empty());
        assert_eq!(world.free_cell_count(), 50);
    }

    #[test]
    fn test_contains() {
        let world = World::new(10, 5);
        assert!(world.contains(Point::new(0, 0)));
        assert!(world.contains(Point::new(9, 4)));
        assert!(!world.contains(Point::new(10, 0)));
        assert!(!world.contains(Point::new(0, 5)));
        assert!(!world.contains(Point::new(-1, 2)));
    }

    #[test]
    fn test_add_moves_entity() {
        let mut world = World::new(10, 10);
        let rock = world.create(Entity::Rock);

        world.add(Point::new(1, 1), rock).unwrap();
        assert!(world.is_used(Point::new(1, 1)));

        world.add(Point::new(2, 2), rock).unwrap();
        assert!(!world.is_used(Point::new(1, 1)));
        assert!(world.is_used(Point::new(2, 2)));
        assert_eq!(world.get_position(rock).unwrap(), Point::new(2, 2));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_add_same_point_is_noop() {
        let mut world = World::new(10, 10);
        let tree = world.create(Entity::Tree);
        world.add(Point::new(3, 3), tree).unwrap();

        let before = world.bindings();
        world.add(Point::new(3, 3), tree).unwrap();
        assert_eq!(world.bindings(), before);
        assert_eq!(world.entity_at(Point::new(3, 3)), Some(tree));
    }

    #[test]
    fn test_add_occupied_point_fails() {
        let mut world = World::new(10, 10);
        let rock = world.create(Entity::Rock);
        let tree = world.create(Entity::Tree);
        world.add(Point::new(1, 1), rock).unwrap();
        world.add(Point::new(4, 4), tree).unwrap();

        let err = world.add(Point::new(1, 1), tree).unwrap_err();
        assert!(matches!(err, Error::PointOccupied(p) if p == Point::new(1, 1)));
        assert_eq!(world.get_position(tree).unwrap(), Point::new(4, 4));
        assert_eq!(world.entity_at(Point::new(1, 1)), Some(rock));
    }

    #[test]
    fn test_add_out_of_bounds_fails() {
        let mut world = World::new(3, 3);
        let rock = world.create(Entity::Rock);
        assert!(matches!(
            world.add(Point::new(3, 0), rock),
            Err(Error::OutOfBounds(_))
        ));
        assert!(world.is_empty());
    }

    #[test]
    fn test_remove_and_lookup() {
        let mut world = World::new(10, 10);
        let grass = world.create(Entity::grass(5));
        world.add(Point::new(5, 5), grass).unwrap();

        world.remove(grass).unwrap();
        assert!(!world.is_used(Point::new(5, 5)));
        assert!(matches!(
            world.get_position(grass),
            Err(Error::EntityNotFound(id)) if id == grass
        ));
        assert!(matches!(world.remove(grass), Err(Error::EntityNotFound(_))));

        // The record survives removal
        assert_eq!(world.entity(grass).unwrap(), &Entity::grass(5));
    }

    #[test]
    fn test_handles_are_never_reused() {
        let mut world = World::new(4, 4);
        let first = world.create(Entity::Rock);
        world.add(Point::new(0, 0), first).unwrap();
        world.remove(first).unwrap();

        let second = world.create(Entity::Rock);
        assert_ne!(first, second);
        assert!(world.entity(first).is_ok());
    }

    #[test]
    fn test_get_entities_by_filter() {
        let mut world = World::new(10, 10);
        let herbivore = world.create(Entity::herbivore(10, 1, 5, 20));
        let grass = world.create(Entity::grass(5));
        let predator = world.create(Entity::predator(10, 1, 5, 3));
        world.add(Point::new(0, 0), herbivore).unwrap();
        world.add(Point::new(1, 0), grass).unwrap();
        world.add(Point::new(2, 0), predator).unwrap();

        let creatures = world.get_entities(EntityFilter::Creatures);
        assert_eq!(
            creatures,
            vec![(Point::new(0, 0), herbivore), (Point::new(2, 0), predator)]
        );

        let grasses = world.get_entities(EntityKind::Grass);
        assert_eq!(grasses, vec![(Point::new(1, 0), grass)]);
        assert_eq!(world.get_all().len(), 3);
    }

    #[test]
    fn test_census() {
        let mut world = World::new(4, 4);
        for x in 0..3 {
            let grass = world.create(Entity::grass(1));
            world.add(Point::new(x, 0), grass).unwrap();
        }
        let rock = world.create(Entity::Rock);
        world.add(Point::new(0, 1), rock).unwrap();

        let census = world.census();
        assert_eq!(census.get(EntityKind::Grass), 3);
        assert_eq!(census.get(EntityKind::Rock), 1);
        assert_eq!(census.get(EntityKind::Predator), 0);
        assert_eq!(census.total(), 4);
        assert_eq!(world.free_cells().len(), 12);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, i32, i32),
        Remove(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..6, 0i32..4, 0i32..4).prop_map(|(e, x, y)| Op::Add(e, x, y)),
            (0usize..6).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_at_most_one_entity_per_point(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let mut world = World::new(4, 4);
            let ids: Vec<EntityId> = (0..6).map(|_| world.create(Entity::Rock)).collect();

            for op in ops {
                match op {
                    Op::Add(e, x, y) => { let _ = world.add(Point::new(x, y), ids[e]); }
                    Op::Remove(e) => { let _ = world.remove(ids[e]); }
                }

                let bindings = world.bindings();
                let mut seen = std::collections::HashSet::new();
                for (&id, &point) in &bindings {
                    prop_assert!(seen.insert(point));
                    prop_assert_eq!(world.entity_at(point), Some(id));
                }
                for y in 0..4 {
                    for x in 0..4 {
                        let point = Point::new(x, y);
                        prop_assert_eq!(world.is_used(point), seen.contains(&point));
                    }
                }
            }
        }
    }
}
