//! # Partition Grid
//!
//! The macro grid: one optional [`Partition`] per tile. Neighboring partitions must
//! agree on every door of their shared edge, which is enforced by deriving the
//! forced doors of a cell from its already-assigned neighbors before sampling.

use crate::config::DOOR_COUNT;
use crate::generation::partition::{Partition, PartitionConstraints};
use crate::generation::tile::Tile;
use crate::{CubelikeError, CubelikeResult, Direction, Position};
use serde::{Deserialize, Serialize};

/// What the neighbors of a cell require of one of its door slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorRequirement {
    /// The facing neighbor door is open
    Open,
    /// The facing neighbor door is closed, or the slot faces the map boundary
    Closed,
    /// Nothing decided yet
    Free,
}

/// 2D array of optional partitions, one per macro cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionGrid {
    width: i32,
    height: i32,
    cells: Vec<Option<Partition>>,
}

impl PartitionGrid {
    /// Creates an unassigned grid.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width.max(0) * height.max(0)) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Checks if a macro cell lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    /// Gets the partition at `pos`; `None` if unassigned or outside the grid.
    pub fn get(&self, pos: Position) -> Option<&Partition> {
        if self.in_bounds(pos) {
            self.cells[self.index(pos)].as_ref()
        } else {
            None
        }
    }

    /// Assigns the partition at `pos`.
    pub fn set(&mut self, pos: Position, partition: Partition) -> CubelikeResult<()> {
        if !self.in_bounds(pos) {
            return Err(CubelikeError::OutOfBounds(pos));
        }
        let index = self.index(pos);
        self.cells[index] = Some(partition);
        Ok(())
    }

    /// Checks that every cell has a partition.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// All macro cells, row by row.
    pub fn positions(&self) -> Vec<Position> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Position::new(x, y)))
            .collect()
    }

    /// Derives, for each of the 8 slots at `pos`, whether the neighbors force it
    /// open or closed.
    ///
    /// A slot mirrors the neighbor's connecting door. Slots facing an unassigned
    /// neighbor are free; slots facing the map boundary are free unless
    /// `prevent_boundary` closes them.
    pub fn needed_doors(&self, pos: Position, prevent_boundary: bool) -> [DoorRequirement; DOOR_COUNT] {
        let mut needed = [DoorRequirement::Free; DOOR_COUNT];
        for direction in Direction::cardinal() {
            let neighbor_pos = pos.step(direction);
            for door in Tile::doors_on_side(direction) {
                needed[door] = if !self.in_bounds(neighbor_pos) {
                    if prevent_boundary {
                        DoorRequirement::Closed
                    } else {
                        DoorRequirement::Free
                    }
                } else {
                    match self.get(neighbor_pos) {
                        None => DoorRequirement::Free,
                        Some(neighbor) if neighbor.has_door(Tile::connecting_door(door)) => {
                            DoorRequirement::Open
                        }
                        Some(_) => DoorRequirement::Closed,
                    }
                };
            }
        }
        needed
    }

    /// Turns [`needed_doors`](Self::needed_doors) into sampling constraints.
    pub fn constraints_at(&self, pos: Position, prevent_boundary: bool) -> PartitionConstraints {
        let needed = self.needed_doors(pos, prevent_boundary);
        let mut constraints = PartitionConstraints::new();
        for (door, requirement) in needed.into_iter().enumerate() {
            match requirement {
                DoorRequirement::Open => constraints.force_open.push(door),
                DoorRequirement::Closed => constraints.force_closed.push(door),
                DoorRequirement::Free => {}
            }
        }
        constraints
    }

    /// Checks that `partition` placed at `pos` agrees with its assigned neighbors,
    /// on one side or on all four.
    pub fn is_valid_at(&self, pos: Position, partition: &Partition, direction: Option<Direction>) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let Some(direction) = direction else {
            return Direction::cardinal()
                .into_iter()
                .all(|direction| self.is_valid_at(pos, partition, Some(direction)));
        };

        match self.get(pos.step(direction)) {
            None => true,
            Some(neighbor) => Tile::doors_on_side(direction)
                .into_iter()
                .all(|door| partition.has_door(door) == neighbor.has_door(Tile::connecting_door(door))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(groups: &[&[usize]]) -> Partition {
        Partition::new(groups.iter().map(|g| g.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_get_and_set() {
        let mut grid = PartitionGrid::new(2, 3);
        assert!(grid.get(Position::new(1, 2)).is_none());
        assert!(!grid.is_complete());

        grid.set(Position::new(1, 2), partition(&[&[0, 1]])).unwrap();
        assert_eq!(grid.get(Position::new(1, 2)), Some(&partition(&[&[0, 1]])));
        assert!(grid.set(Position::new(2, 0), Partition::closed()).is_err());
        assert!(grid.get(Position::new(-1, 0)).is_none());
    }

    #[test]
    fn test_needed_doors_mirror_neighbors() {
        let mut grid = PartitionGrid::new(3, 3);
        let center = Position::new(1, 1);
        // Above: bottom-left door 5 open, bottom-right door 4 closed
        grid.set(Position::new(1, 0), partition(&[&[5]])).unwrap();
        // Right: left-upper door 7 open
        grid.set(Position::new(2, 1), partition(&[&[7, 6]])).unwrap();

        let needed = grid.needed_doors(center, false);
        assert_eq!(needed[0], DoorRequirement::Open); // faces door 5
        assert_eq!(needed[1], DoorRequirement::Closed); // faces door 4
        assert_eq!(needed[2], DoorRequirement::Open); // faces door 7
        assert_eq!(needed[3], DoorRequirement::Open); // faces door 6
        assert_eq!(needed[4], DoorRequirement::Free);
        assert_eq!(needed[7], DoorRequirement::Free);
    }

    #[test]
    fn test_needed_doors_on_boundary() {
        let grid = PartitionGrid::new(2, 2);
        let needed = grid.needed_doors(Position::origin(), true);
        assert_eq!(needed[0], DoorRequirement::Closed);
        assert_eq!(needed[1], DoorRequirement::Closed);
        assert_eq!(needed[2], DoorRequirement::Free);
        assert_eq!(needed[6], DoorRequirement::Closed);

        let needed = grid.needed_doors(Position::origin(), false);
        assert!(needed.iter().all(|&r| r == DoorRequirement::Free));
    }

    #[test]
    fn test_constraints_at() {
        let mut grid = PartitionGrid::new(2, 1);
        grid.set(Position::new(1, 0), partition(&[&[6]])).unwrap();
        let constraints = grid.constraints_at(Position::origin(), true);
        assert_eq!(constraints.force_open, vec![3]);
        assert_eq!(constraints.force_closed, vec![0, 1, 2, 4, 5, 6, 7]);
    }

    #[test]
    fn test_is_valid_at() {
        let mut grid = PartitionGrid::new(2, 1);
        grid.set(Position::new(1, 0), partition(&[&[6, 7]])).unwrap();
        let origin = Position::origin();

        assert!(grid.is_valid_at(origin, &partition(&[&[2, 3]]), None));
        assert!(grid.is_valid_at(origin, &partition(&[&[2, 3], &[4]]), Some(Direction::East)));
        assert!(!grid.is_valid_at(origin, &partition(&[&[2]]), None));
        assert!(!grid.is_valid_at(origin, &Partition::closed(), Some(Direction::East)));
        // Unassigned sides impose nothing
        assert!(grid.is_valid_at(origin, &partition(&[&[2]]), Some(Direction::North)));
        assert!(!grid.is_valid_at(Position::new(5, 5), &Partition::closed(), None));
    }
}
