//! # Tile Grid
//!
//! Tiles assembled into one global cell grid. Tile origins sit `stride` cells
//! apart; a tile larger than the stride has its overhang hidden behind the
//! neighbor's near edge.

use crate::generation::cell::{Cell, CellGrid, CellGridMut};
use crate::generation::tile::Tile;
use crate::{CubelikeError, CubelikeResult, Position};
use std::fmt;

/// A rectangular arrangement of optional tiles addressed by global coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    grid_width: i32,
    grid_height: i32,
    stride: i32,
    tiles: Vec<Option<Tile>>,
}

impl TileGrid {
    /// Creates a grid with no tiles.
    pub fn new(grid_width: u32, grid_height: u32, stride: u32) -> Self {
        Self {
            grid_width: grid_width as i32,
            grid_height: grid_height as i32,
            stride: stride as i32,
            tiles: vec![None; (grid_width * grid_height) as usize],
        }
    }

    pub fn grid_width(&self) -> i32 {
        self.grid_width
    }

    pub fn grid_height(&self) -> i32 {
        self.grid_height
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    fn slot(&self, cell: Position) -> Option<usize> {
        if cell.x >= 0 && cell.y >= 0 && cell.x < self.grid_width && cell.y < self.grid_height {
            Some((cell.y * self.grid_width + cell.x) as usize)
        } else {
            None
        }
    }

    /// The tile at macro cell `cell`, if one was set.
    pub fn get_tile(&self, cell: Position) -> Option<&Tile> {
        self.slot(cell).and_then(|slot| self.tiles[slot].as_ref())
    }

    pub fn get_tile_mut(&mut self, cell: Position) -> Option<&mut Tile> {
        match self.slot(cell) {
            Some(slot) => self.tiles[slot].as_mut(),
            None => None,
        }
    }

    /// Places `tile` at macro cell `cell`. The tile must cover a full stride.
    pub fn set_tile(&mut self, cell: Position, tile: Tile) -> CubelikeResult<()> {
        if tile.size() < self.stride {
            return Err(CubelikeError::InvalidConfig(format!(
                "tile of size {} cannot cover a stride of {}",
                tile.size(),
                self.stride
            )));
        }
        let slot = self.slot(cell).ok_or(CubelikeError::OutOfBounds(cell))?;
        self.tiles[slot] = Some(tile);
        Ok(())
    }

    /// The macro cell whose tile shows the global position `pos`.
    pub fn tile_index_at(&self, pos: Position) -> Option<Position> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(Position::new(pos.x / self.stride, pos.y / self.stride))
    }

    /// Converts a global position into coordinates inside its tile.
    pub fn rel_coords(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.stride), pos.y.rem_euclid(self.stride))
    }

    /// The global position of a macro cell's origin.
    pub fn tile_origin(&self, cell: Position) -> Position {
        Position::new(cell.x * self.stride, cell.y * self.stride)
    }
}

impl CellGrid for TileGrid {
    fn width(&self) -> i32 {
        self.grid_width * self.stride
    }

    fn height(&self) -> i32 {
        self.grid_height * self.stride
    }

    fn get(&self, pos: Position) -> Cell {
        match self.tile_index_at(pos).and_then(|cell| self.get_tile(cell)) {
            Some(tile) => tile.get(self.rel_coords(pos)),
            None => Cell::Empty,
        }
    }
}

impl CellGridMut for TileGrid {
    /// Writes through to the owning tile. Clearing a cell with no tile is a no-op.
    fn set(&mut self, pos: Position, cell: Cell) -> CubelikeResult<()> {
        let Some(index) = self.tile_index_at(pos) else {
            if cell == Cell::Empty {
                return Ok(());
            }
            return Err(CubelikeError::OutOfBounds(pos));
        };
        let rel = self.rel_coords(pos);
        match self.get_tile_mut(index) {
            Some(tile) => tile.set(rel, cell),
            None if cell == Cell::Empty => Ok(()),
            None => Err(CubelikeError::MissingTile(pos)),
        }
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::rendering::TextRenderer::plain().render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_tiles() -> TileGrid {
        let mut grid = TileGrid::new(2, 1, 12);
        let mut left = Tile::new(13, 3, 1).unwrap();
        left.set(Position::new(12, 3), Cell::Door).unwrap();
        left.set(Position::new(11, 3), Cell::Floor).unwrap();
        let mut right = Tile::new(13, 3, 1).unwrap();
        right.set(Position::new(0, 3), Cell::Wall).unwrap();
        grid.set_tile(Position::new(0, 0), left).unwrap();
        grid.set_tile(Position::new(1, 0), right).unwrap();
        grid
    }

    #[test]
    fn test_dimensions_follow_stride() {
        let grid = TileGrid::new(3, 2, 12);
        assert_eq!(grid.width(), 36);
        assert_eq!(grid.height(), 24);
        assert_eq!(grid.tile_index_at(Position::new(25, 13)), Some(Position::new(2, 1)));
        assert_eq!(grid.rel_coords(Position::new(25, 13)), Position::new(1, 1));
        assert_eq!(grid.tile_index_at(Position::new(36, 0)), None);
        assert_eq!(grid.tile_index_at(Position::new(-1, 0)), None);
    }

    #[test]
    fn test_overhang_is_hidden_by_neighbor() {
        let grid = grid_with_tiles();
        assert_eq!(grid.get(Position::new(11, 3)), Cell::Floor);
        // The left tile's column 12 is covered by the right tile's column 0
        assert_eq!(grid.get(Position::new(12, 3)), Cell::Wall);
        assert_eq!(grid.get_tile(Position::new(0, 0)).unwrap().get(Position::new(12, 3)), Cell::Door);
    }

    #[test]
    fn test_writes_go_to_owning_tile() {
        let mut grid = grid_with_tiles();
        grid.set(Position::new(14, 5), Cell::Chest).unwrap();
        assert_eq!(grid.get_tile(Position::new(1, 0)).unwrap().get(Position::new(2, 5)), Cell::Chest);
        assert_eq!(grid.get(Position::new(14, 5)), Cell::Chest);
    }

    #[test]
    fn test_missing_tiles() {
        let mut grid = TileGrid::new(2, 2, 12);
        assert_eq!(grid.get(Position::new(3, 3)), Cell::Empty);
        assert!(grid.set(Position::new(3, 3), Cell::Empty).is_ok());
        assert!(matches!(
            grid.set(Position::new(3, 3), Cell::Floor),
            Err(CubelikeError::MissingTile(_))
        ));
        assert!(matches!(
            grid.set(Position::new(-1, 3), Cell::Floor),
            Err(CubelikeError::OutOfBounds(_))
        ));
        assert!(grid.set(Position::new(-1, 3), Cell::Empty).is_ok());
    }

    #[test]
    fn test_set_tile_checks_size_and_slot() {
        let mut grid = TileGrid::new(1, 1, 12);
        assert!(grid.set_tile(Position::origin(), Tile::new(11, 3, 1).unwrap()).is_err());
        assert!(grid.set_tile(Position::new(1, 0), Tile::new(13, 3, 1).unwrap()).is_err());
        assert!(grid.set_tile(Position::origin(), Tile::new(12, 3, 1).unwrap()).is_ok());
    }
}
