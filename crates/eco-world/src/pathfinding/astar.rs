//! A* search keyed by steps taken plus Chebyshev distance to the goal.

use crate::world::World;
use eco_core::{Error, Point, Result};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

struct Node {
    point: Point,
    steps: i32,
    parent: Option<usize>,
}

pub(super) fn find_path(start: Point, goal: Point, world: &World) -> Result<Vec<Point>> {
    let mut nodes = vec![Node {
        point: start,
        steps: 0,
        parent: None,
    }];
    // (priority, insertion sequence, node index); the sequence keeps ties FIFO
    let mut open = BinaryHeap::new();
    let mut closed: HashSet<Point> = HashSet::new();
    let mut sequence: u64 = 0;

    open.push(Reverse((start.chebyshev_distance(&goal), sequence, 0usize)));

    while let Some(Reverse((_, _, index))) = open.pop() {
        let (point, steps) = (nodes[index].point, nodes[index].steps);
        if !closed.insert(point) {
            continue;
        }

        if point.is_adjacent(&goal) {
            return Ok(unwind(&nodes, index));
        }

        for next in point.neighbors() {
            if !world.is_free(next) || closed.contains(&next) {
                continue;
            }

            nodes.push(Node {
                point: next,
                steps: steps + 1,
                parent: Some(index),
            });
            sequence += 1;
            let priority = steps + 1 + next.chebyshev_distance(&goal);
            open.push(Reverse((priority, sequence, nodes.len() - 1)));
        }
    }

    Err(Error::PathNotFound {
        from: start,
        to: goal,
    })
}

fn unwind(nodes: &[Node], end: usize) -> Vec<Point> {
    let mut path = Vec::with_capacity(nodes[end].steps as usize + 1);
    let mut current = Some(end);
    while let Some(index) = current {
        path.push(nodes[index].point);
        current = nodes[index].parent;
    }
    path.reverse();
    path
}
