//! Breadth-first search.

use crate::world::World;
use eco_core::{Error, Point, Result};
use std::collections::{HashMap, VecDeque};

pub(super) fn find_path(start: Point, goal: Point, world: &World) -> Result<Vec<Point>> {
    let mut parents: HashMap<Point, Option<Point>> = HashMap::new();
    let mut queue = VecDeque::new();

    parents.insert(start, None);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current.is_adjacent(&goal) {
            return Ok(unwind(&parents, current));
        }

        for next in current.neighbors() {
            if !world.is_free(next) || parents.contains_key(&next) {
                continue;
            }
            parents.insert(next, Some(current));
            queue.push_back(next);
        }
    }

    Err(Error::PathNotFound {
        from: start,
        to: goal,
    })
}

fn unwind(parents: &HashMap<Point, Option<Point>>, end: Point) -> Vec<Point> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&Some(parent)) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    #[test]
    fn test_neighbor_order_breaks_ties() {
        let mut world = World::new(10, 10);
        let rock = world.create(Entity::Rock);
        world.add(Point::new(1, 0), rock).unwrap();

        // With (1,0) blocked the first shortest route goes through the diagonal
        let path = find_path(Point::new(0, 0), Point::new(3, 1), &world).unwrap();
        assert_eq!(path, vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 1)]);
    }
}
