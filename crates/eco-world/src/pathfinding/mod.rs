//! Path search over the world's occupancy grid.
//!
//! A search succeeds at the first point within one cell of the goal, so the
//! goal itself never has to be free. Returned paths start with the start point.
//! Occupied and out-of-bounds cells are impassable.

mod astar;
mod bfs;

use crate::world::World;
use eco_core::{PathfindingKind, Point, Result};

/// Search algorithm used by the move turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathStrategy {
    Bfs,
    #[default]
    AStar,
}

impl PathStrategy {
    /// Walkable route from `start` to a point adjacent to `goal`
    pub fn find_path(&self, start: Point, goal: Point, world: &World) -> Result<Vec<Point>> {
        match self {
            PathStrategy::Bfs => bfs::find_path(start, goal, world),
            PathStrategy::AStar => astar::find_path(start, goal, world),
        }
    }
}

impl From<PathfindingKind> for PathStrategy {
    fn from(kind: PathfindingKind) -> Self {
        match kind {
            PathfindingKind::Bfs => PathStrategy::Bfs,
            PathfindingKind::Astar => PathStrategy::AStar,
        }
    }
}
