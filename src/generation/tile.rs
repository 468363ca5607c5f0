//! # Tiles
//!
//! A tile is the square character grid behind one macro cell. Its door and hub
//! geometry is derived from three numbers: the tile size, the door offset from the
//! nearest corner, and the door run length.

use crate::config::DOOR_COUNT;
use crate::generation::cell::{Cell, CellGrid, CellGridMut};
use crate::generation::partition::DoorSlot;
use crate::{CubelikeError, CubelikeResult, Direction, Position, Rect};
use std::fmt;

/// A square grid of cells with 8 door slots, 2 per side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    size: i32,
    door_offset: i32,
    door_length: i32,
    cells: Vec<Cell>,
}

impl Tile {
    /// Creates an empty tile.
    ///
    /// The four corner hubs must be disjoint and separated by at least one cell, so
    /// `size` must be at least `2 * (door_offset + door_length) + 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubelike::Tile;
    ///
    /// let tile = Tile::new(13, 3, 1).unwrap();
    /// assert_eq!(tile.size(), 13);
    /// assert!(Tile::new(8, 3, 2).is_err());
    /// ```
    pub fn new(size: u32, door_offset: u32, door_length: u32) -> CubelikeResult<Self> {
        if door_offset < 1 || door_length < 1 {
            return Err(CubelikeError::InvalidConfig(format!(
                "door offset ({door_offset}) and door length ({door_length}) must be at least 1"
            )));
        }
        let minimum = 2 * (door_offset + door_length) + 1;
        if size < minimum {
            return Err(CubelikeError::InvalidConfig(format!(
                "tile size {size} is too small for door offset {door_offset} and length {door_length} (need {minimum})"
            )));
        }

        Ok(Self {
            size: size as i32,
            door_offset: door_offset as i32,
            door_length: door_length as i32,
            cells: vec![Cell::Empty; (size * size) as usize],
        })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn door_offset(&self) -> i32 {
        self.door_offset
    }

    pub fn door_length(&self) -> i32 {
        self.door_length
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.size + pos.x) as usize
    }

    /// Resets every cell to `Empty`.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Empty);
    }

    /// Sets every cell of `rect` that lies inside the tile.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        for pos in rect.positions() {
            if self.in_bounds(pos) {
                let index = self.index(pos);
                self.cells[index] = cell;
            }
        }
    }

    /// The run of cells forming door slot `door`.
    ///
    /// # Panics
    ///
    /// Panics if `door` is not a door slot (`door >= DOOR_COUNT`). Slots taken from
    /// a [`Partition`](crate::Partition) are always in range.
    pub fn door_coords(&self, door: DoorSlot) -> Vec<Position> {
        let (w, h) = (self.size, self.size);
        let (offs, len) = (self.door_offset, self.door_length);
        let (start, step) = match door {
            0 => (Position::new(offs, 0), Position::new(1, 0)),
            1 => (Position::new(w - len - offs, 0), Position::new(1, 0)),
            2 => (Position::new(w - 1, offs), Position::new(0, 1)),
            3 => (Position::new(w - 1, h - len - offs), Position::new(0, 1)),
            4 => (Position::new(w - len - offs, h - 1), Position::new(1, 0)),
            5 => (Position::new(offs, h - 1), Position::new(1, 0)),
            6 => (Position::new(0, h - len - offs), Position::new(0, 1)),
            7 => (Position::new(0, offs), Position::new(0, 1)),
            _ => panic!("door slot {door} out of range"),
        };
        (0..len)
            .map(|i| Position::new(start.x + step.x * i, start.y + step.y * i))
            .collect()
    }

    /// The two door slots on one side, in clockwise order.
    pub fn doors_on_side(side: Direction) -> [DoorSlot; 2] {
        match side {
            Direction::North => [0, 1],
            Direction::East => [2, 3],
            Direction::South => [4, 5],
            Direction::West => [6, 7],
        }
    }

    /// The side a door slot sits on.
    pub fn side_of(door: DoorSlot) -> Direction {
        Direction::cardinal()[(door / 2) % 4]
    }

    /// The slot on the neighboring tile that touches `door` across the shared edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubelike::Tile;
    ///
    /// assert_eq!(Tile::connecting_door(0), 5);
    /// assert_eq!(Tile::connecting_door(7), 2);
    /// ```
    pub fn connecting_door(door: DoorSlot) -> DoorSlot {
        if door % 2 == 0 {
            (door + 5) % DOOR_COUNT
        } else {
            (door + 3) % DOOR_COUNT
        }
    }

    /// The corner (0 top-left, 1 top-right, 2 bottom-right, 3 bottom-left) whose hub
    /// serves `door`.
    pub fn corner_of(door: DoorSlot) -> usize {
        ((door + 1) % DOOR_COUNT) / 2
    }

    /// The square hub region of one corner.
    pub fn corner_hub_coords(&self, corner: usize) -> Vec<Position> {
        let hub = self.door_length;
        let far = self.size - self.door_offset - hub;
        let near = self.door_offset;
        let min = match corner % 4 {
            0 => Position::new(near, near),
            1 => Position::new(far, near),
            2 => Position::new(far, far),
            _ => Position::new(near, far),
        };
        Rect::new(min.x, min.y, hub as u32, hub as u32).positions()
    }

    /// The hub region associated with `door`.
    pub fn hub_coords(&self, door: DoorSlot) -> Vec<Position> {
        self.corner_hub_coords(Self::corner_of(door))
    }

    /// The cells strictly between the hubs of `hub_coords(2n)` and
    /// `hub_coords(2n + 1)`; for `n` in 0..4 these are the four sides of the hub ring.
    pub fn hub_connection_coords(&self, n: usize) -> Vec<Position> {
        let first = self.hub_coords(2 * n);
        let second = self.hub_coords(2 * n + 1);
        let hubs: Vec<Position> = first.iter().chain(&second).copied().collect();
        match Rect::containing(&hubs) {
            Some(enclosing) => enclosing
                .positions()
                .into_iter()
                .filter(|pos| !hubs.contains(pos))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl CellGrid for Tile {
    fn width(&self) -> i32 {
        self.size
    }

    fn height(&self) -> i32 {
        self.size
    }

    fn get(&self, pos: Position) -> Cell {
        if self.in_bounds(pos) {
            self.cells[self.index(pos)]
        } else {
            Cell::Empty
        }
    }
}

impl CellGridMut for Tile {
    fn set(&mut self, pos: Position, cell: Cell) -> CubelikeResult<()> {
        if !self.in_bounds(pos) {
            return Err(CubelikeError::OutOfBounds(pos));
        }
        let index = self.index(pos);
        self.cells[index] = cell;
        Ok(())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::rendering::TextRenderer::plain().render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_door_coords_layout() {
        let tile = Tile::new(13, 3, 2).unwrap();
        assert_eq!(tile.door_coords(0), vec![Position::new(3, 0), Position::new(4, 0)]);
        assert_eq!(tile.door_coords(1), vec![Position::new(8, 0), Position::new(9, 0)]);
        assert_eq!(tile.door_coords(2), vec![Position::new(12, 3), Position::new(12, 4)]);
        assert_eq!(tile.door_coords(3), vec![Position::new(12, 8), Position::new(12, 9)]);
        assert_eq!(tile.door_coords(4), vec![Position::new(8, 12), Position::new(9, 12)]);
        assert_eq!(tile.door_coords(5), vec![Position::new(3, 12), Position::new(4, 12)]);
        assert_eq!(tile.door_coords(6), vec![Position::new(0, 8), Position::new(0, 9)]);
        assert_eq!(tile.door_coords(7), vec![Position::new(0, 3), Position::new(0, 4)]);
    }

    #[test]
    #[should_panic(expected = "door slot 8 out of range")]
    fn test_door_coords_rejects_unknown_slot() {
        let tile = Tile::new(13, 3, 1).unwrap();
        tile.door_coords(DOOR_COUNT);
    }

    #[test]
    fn test_doors_on_side_match_side_of() {
        for side in Direction::cardinal() {
            for door in Tile::doors_on_side(side) {
                assert_eq!(Tile::side_of(door), side);
            }
        }
    }

    #[test]
    fn test_connecting_doors_touch_across_edges() {
        let size = 13;
        let tile = Tile::new(size as u32, 3, 1).unwrap();
        for door in 0..DOOR_COUNT {
            let partner = Tile::connecting_door(door);
            assert_eq!(Tile::connecting_door(partner), door);

            // Place the partner in the neighbouring tile and check the runs touch
            let side = Tile::side_of(door);
            assert_eq!(Tile::side_of(partner), side.opposite());
            let offset = Position::new(side.to_delta().x * size, side.to_delta().y * size);
            let mine = tile.door_coords(door)[0];
            let theirs = tile.door_coords(partner)[0] + offset;
            assert_eq!(mine.manhattan_distance(theirs), 1, "door {door}");
        }
    }

    #[test]
    fn test_hubs_are_disjoint_corners() {
        let tile = Tile::new(13, 3, 2).unwrap();
        assert_eq!(tile.hub_coords(0), tile.hub_coords(7));
        assert_eq!(tile.hub_coords(1), tile.hub_coords(2));
        assert_eq!(tile.hub_coords(3), tile.hub_coords(4));
        assert_eq!(tile.hub_coords(5), tile.hub_coords(6));
        assert!(tile.hub_coords(0).contains(&Position::new(3, 3)));
        assert!(tile.hub_coords(3).contains(&Position::new(9, 9)));

        let mut seen = HashSet::new();
        for corner in 0..4 {
            for pos in tile.corner_hub_coords(corner) {
                assert!(seen.insert(pos));
            }
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn test_hub_connections_bridge_neighbouring_hubs() {
        let tile = Tile::new(13, 3, 2).unwrap();
        let top = tile.hub_connection_coords(0);
        // Between x=5 and x=7 on rows 3..5
        assert_eq!(top.len(), 3 * 2);
        assert!(top.contains(&Position::new(5, 3)));
        assert!(top.contains(&Position::new(7, 4)));

        for n in 0..4 {
            let zone = tile.hub_connection_coords(n);
            assert!(!zone.is_empty());
            for pos in &zone {
                assert!(!tile.hub_coords(2 * n).contains(pos));
                assert!(!tile.hub_coords(2 * n + 1).contains(pos));
            }
        }
    }

    #[test]
    fn test_tile_too_small() {
        assert!(Tile::new(9, 3, 1).is_ok());
        assert!(Tile::new(8, 3, 1).is_err());
        assert!(Tile::new(13, 0, 1).is_err());
        assert!(Tile::new(13, 3, 0).is_err());
    }

    #[test]
    fn test_set_get_and_fill() {
        let mut tile = Tile::new(9, 2, 1).unwrap();
        tile.set(Position::new(8, 8), Cell::Door).unwrap();
        assert_eq!(tile.get(Position::new(8, 8)), Cell::Door);
        assert!(tile.set(Position::new(9, 0), Cell::Floor).is_err());

        tile.fill(Rect::new(7, 7, 5, 5), Cell::Floor);
        assert_eq!(tile.count(Cell::Floor), 4);
        tile.clear();
        assert_eq!(tile.count(Cell::Empty), 81);
    }
}
