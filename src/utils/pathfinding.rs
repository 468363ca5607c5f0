//! # Pathfinding Algorithms
//!
//! Iterative flood fills and shortest walks over cell grids.

use crate::generation::cell::{Cell, CellGrid};
use crate::Position;
use ::pathfinding::prelude::{bfs, bfs_reach};
use std::collections::HashSet;

/// Collects every position 4-connected to `start` through cells accepted by
/// `passable`, staying inside the grid.
///
/// Returns an empty set when `start` itself is not passable.
pub fn flood_fill<G, F>(grid: &G, start: Position, passable: F) -> HashSet<Position>
where
    G: CellGrid + ?Sized,
    F: Fn(Cell) -> bool,
{
    if !grid.in_bounds(start) || !passable(grid.get(start)) {
        return HashSet::new();
    }

    bfs_reach(start, |&pos| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|&next| grid.in_bounds(next) && passable(grid.get(next)))
            .collect::<Vec<_>>()
    })
    .collect()
}

/// Finds a shortest 4-connected walk from `from` to any position accepted by
/// `is_goal`, moving only through walkable cells.
pub fn shortest_walk<G, F>(grid: &G, from: Position, is_goal: F) -> Option<Vec<Position>>
where
    G: CellGrid + ?Sized,
    F: Fn(Position) -> bool,
{
    bfs(
        &from,
        |&pos| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|&next| grid.in_bounds(next) && grid.get(next).is_walkable())
                .collect::<Vec<_>>()
        },
        |&pos| is_goal(pos),
    )
}

/// Checks whether `to` can be walked to from `from`.
pub fn is_reachable<G: CellGrid + ?Sized>(grid: &G, from: Position, to: Position) -> bool {
    shortest_walk(grid, from, |pos| pos == to).is_some()
}
