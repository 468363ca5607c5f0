//! # Macro Layout
//!
//! Builds the macro grid: a random self-avoiding path from a start cell to an end
//! cell, partitions along the path that carry connectivity from each entry door to
//! the next exit door, and unconstrained partitions for every other cell.

use crate::generation::partition::{DoorSlot, Partition};
use crate::generation::partition_grid::PartitionGrid;
use crate::generation::tile::Tile;
use crate::{CubelikeError, CubelikeResult, Direction, Position};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The macro path together with the fully assigned partition grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroLayout {
    /// Macro cells from start to end
    pub path: Vec<Position>,
    /// One partition per macro cell
    pub partitions: PartitionGrid,
}

/// Walks a random self-avoiding path of 4-adjacent cells from `start` to `end`.
///
/// Depth first with backtracking: dead-end cells are blacklisted and popped. Fails
/// with [`CubelikeError::PathNotFound`] when every cell has been exhausted or either
/// endpoint lies outside the grid.
pub fn random_path_between(
    start: Position,
    end: Position,
    width: i32,
    height: i32,
    rng: &mut StdRng,
) -> CubelikeResult<Vec<Position>> {
    let not_found = || CubelikeError::PathNotFound {
        start,
        end,
        width,
        height,
    };
    let in_bounds = |pos: Position| pos.x >= 0 && pos.y >= 0 && pos.x < width && pos.y < height;
    if !in_bounds(start) || !in_bounds(end) {
        return Err(not_found());
    }

    let mut path = vec![start];
    let mut on_path: HashSet<Position> = HashSet::from([start]);
    let mut blacklist: HashSet<Position> = HashSet::new();

    while let Some(&current) = path.last() {
        if current == end {
            return Ok(path);
        }

        let mut neighbors = current.cardinal_adjacent_positions();
        neighbors.shuffle(rng);
        let next = neighbors
            .into_iter()
            .find(|&n| in_bounds(n) && !on_path.contains(&n) && !blacklist.contains(&n));

        match next {
            Some(next) => {
                path.push(next);
                on_path.insert(next);
            }
            None => {
                path.pop();
                on_path.remove(&current);
                blacklist.insert(current);
            }
        }
    }

    Err(not_found())
}

/// Lays out a complete partition grid around a random path.
///
/// Missing endpoints are drawn uniformly from the grid. Each path cell gets an open
/// door towards the next cell, connected to the door it was entered through; every
/// other cell, visited in random order, only has to agree with its neighbors.
pub fn random_partition_grid(
    width: i32,
    height: i32,
    start: Option<Position>,
    end: Option<Position>,
    prevent_boundary: bool,
    rng: &mut StdRng,
) -> CubelikeResult<MacroLayout> {
    if width <= 0 || height <= 0 {
        return Err(CubelikeError::InvalidConfig(format!(
            "macro grid must be at least 1x1, got {width}x{height}"
        )));
    }
    let start = match start {
        Some(pos) => pos,
        None => Position::new(rng.gen_range(0..width), rng.gen_range(0..height)),
    };
    let end = match end {
        Some(pos) => pos,
        None => Position::new(rng.gen_range(0..width), rng.gen_range(0..height)),
    };

    let path = random_path_between(start, end, width, height, rng)?;
    debug!("macro path from {start} to {end} has {} cells", path.len());

    let mut partitions = PartitionGrid::new(width, height);
    let mut entry_door: Option<DoorSlot> = None;

    for (index, &cell) in path.iter().enumerate() {
        let mut constraints = partitions.constraints_at(cell, prevent_boundary);

        if let Some(&next) = path.get(index + 1) {
            let direction = Direction::from_delta(next - cell).ok_or_else(|| {
                CubelikeError::GenerationFailed(format!("path step {cell} -> {next} is not adjacent"))
            })?;
            let exit_door = *Tile::doors_on_side(direction)
                .choose(rng)
                .ok_or_else(|| CubelikeError::GenerationFailed("side without doors".to_string()))?;
            constraints.force_open.push(exit_door);
            if let Some(entry) = entry_door {
                constraints.force_connected = vec![entry, exit_door];
            }
            entry_door = Some(Tile::connecting_door(exit_door));
        }

        let partition = Partition::random(&constraints, rng)?;
        partitions.set(cell, partition)?;
    }

    let mut remaining: Vec<Position> = partitions
        .positions()
        .into_iter()
        .filter(|&pos| partitions.get(pos).is_none())
        .collect();
    remaining.shuffle(rng);

    for cell in remaining {
        let constraints = partitions.constraints_at(cell, prevent_boundary);
        let partition = Partition::random(&constraints, rng)?;
        partitions.set(cell, partition)?;
    }

    Ok(MacroLayout { path, partitions })
}
