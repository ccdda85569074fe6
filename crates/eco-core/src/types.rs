//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Step offsets a creature may take in one move.
///
/// Only six of the eight surrounding cells are reachable: the anti-diagonal
/// pair `(+1,-1)` and `(-1,+1)` is missing. Path shapes depend on both the set
/// and the enumeration order.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 6] = [(-1, 0), (1, 0), (0, 1), (0, -1), (-1, -1), (1, 1)];

/// Stable handle of an entity record owned by the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D position in the world
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance to another point
    pub fn manhattan_distance(&self, other: &Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Chebyshev distance to another point
    pub fn chebyshev_distance(&self, other: &Point) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Within one cell on both axes (the point itself included)
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.chebyshev_distance(other) <= 1
    }

    /// Points one step away, in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(&self) -> impl Iterator<Item = Point> + '_ {
        NEIGHBOR_OFFSETS.iter().map(move |&(dx, dy)| self.add(dx, dy))
    }

    /// Points along the six step rays out to `radius`, nearest ring first.
    pub fn rays(&self, radius: i32) -> Vec<Point> {
        let mut points = Vec::with_capacity(radius.max(0) as usize * NEIGHBOR_OFFSETS.len());
        for i in 1..=radius {
            for &(dx, dy) in &NEIGHBOR_OFFSETS {
                points.push(self.add(dx * i, dy * i));
            }
        }
        points
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Species of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Rock,
    Tree,
    Grass,
    Herbivore,
    Predator,
}

impl EntityKind {
    pub fn all() -> [EntityKind; 5] {
        [
            EntityKind::Rock,
            EntityKind::Tree,
            EntityKind::Grass,
            EntityKind::Herbivore,
            EntityKind::Predator,
        ]
    }

    /// Whether entities of this kind take turns
    pub fn is_creature(&self) -> bool {
        matches!(self, EntityKind::Herbivore | EntityKind::Predator)
    }

    /// The kind this species hunts or grazes, if any
    pub fn target(&self) -> Option<EntityKind> {
        match self {
            EntityKind::Herbivore => Some(EntityKind::Grass),
            EntityKind::Predator => Some(EntityKind::Herbivore),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Rock => "rock",
            EntityKind::Tree => "tree",
            EntityKind::Grass => "grass",
            EntityKind::Herbivore => "herbivore",
            EntityKind::Predator => "predator",
        };
        f.write_str(name)
    }
}
