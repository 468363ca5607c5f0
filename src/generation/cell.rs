//! # Cells
//!
//! The closed vocabulary of grid values and the grid traits every layer of the
//! generator reads and writes through.

use crate::{CubelikeError, CubelikeResult, Position};
use serde::{Deserialize, Serialize};

/// One cell of a generated grid.
///
/// Marker cells (monster, player, chest, ...) are placeholders: the world builder
/// spawns the matching entity and replaces the marker with floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub enum Cell {
    Floor,
    Wall,
    Door,
    #[default]
    Empty,
    Monster,
    Player,
    Entrance,
    Exit,
    Chest,
    Npc,
    StrayItem,
    Special,
}

impl Cell {
    /// Every cell value, in declaration order.
    pub const ALL: [Cell; 12] = [
        Cell::Floor,
        Cell::Wall,
        Cell::Door,
        Cell::Empty,
        Cell::Monster,
        Cell::Player,
        Cell::Entrance,
        Cell::Exit,
        Cell::Chest,
        Cell::Npc,
        Cell::StrayItem,
        Cell::Special,
    ];

    /// Gets the character used for this cell in grid dumps.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubelike::Cell;
    ///
    /// assert_eq!(Cell::Floor.symbol(), '.');
    /// assert_eq!(Cell::from_symbol('0'), Some(Cell::Door));
    /// ```
    pub fn symbol(self) -> char {
        match self {
            Cell::Floor => '.',
            Cell::Wall => 'x',
            Cell::Door => '0',
            Cell::Empty => ' ',
            Cell::Monster => 'm',
            Cell::Player => 'p',
            Cell::Entrance => 'v',
            Cell::Exit => 'e',
            Cell::Chest => 'c',
            Cell::Npc => 'n',
            Cell::StrayItem => 'i',
            Cell::Special => 's',
        }
    }

    /// Parses a grid dump character.
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        Cell::ALL.into_iter().find(|cell| cell.symbol() == symbol)
    }

    /// Returns true for anything that has been carved or placed.
    pub fn is_carved(self) -> bool {
        self != Cell::Empty
    }

    /// Returns true for entity placeholders.
    pub fn is_marker(self) -> bool {
        !matches!(self, Cell::Floor | Cell::Wall | Cell::Door | Cell::Empty)
    }

    /// Returns true if a creature could stand here once markers are resolved.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Cell::Wall | Cell::Empty)
    }

    /// Returns true for the cells a tile's door connectivity flows through.
    pub fn conducts(self) -> bool {
        matches!(self, Cell::Floor | Cell::Door)
    }
}

impl From<Cell> for char {
    fn from(cell: Cell) -> char {
        cell.symbol()
    }
}

impl TryFrom<char> for Cell {
    type Error = String;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Cell::from_symbol(symbol).ok_or_else(|| format!("unknown cell symbol {symbol:?}"))
    }
}

/// Read access to a rectangular grid of cells.
///
/// Reads outside the grid return [`Cell::Empty`], which lets neighborhood checks run
/// on edge cells without special cases.
pub trait CellGrid {
    /// Width in cells.
    fn width(&self) -> i32;

    /// Height in cells.
    fn height(&self) -> i32;

    /// Gets the cell at `pos`, or `Empty` outside the grid.
    fn get(&self, pos: Position) -> Cell;

    /// Checks if a position lies inside the grid.
    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width() && pos.y < self.height()
    }

    /// All positions of the grid, column by column.
    fn positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity((self.width() * self.height()).max(0) as usize);
        for x in 0..self.width() {
            for y in 0..self.height() {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// Counts the cells equal to `cell`.
    fn count(&self, cell: Cell) -> usize {
        self.positions()
            .into_iter()
            .filter(|&pos| self.get(pos) == cell)
            .count()
    }
}

/// Write access to a grid of cells.
pub trait CellGridMut: CellGrid {
    /// Sets the cell at `pos`.
    fn set(&mut self, pos: Position, cell: Cell) -> CubelikeResult<()>;

    /// Sets the cell at `pos` to `to` only if it currently holds `from`.
    fn replace(&mut self, pos: Position, from: Cell, to: Cell) -> CubelikeResult<bool> {
        if self.in_bounds(pos) && self.get(pos) == from {
            self.set(pos, to)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// A plain owned grid of cells, used for scratch work and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl CellBuffer {
    /// Creates a grid filled with `Empty`.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; (width.max(0) * height.max(0)) as usize],
        }
    }

    /// Parses a grid from dump rows (one character per cell).
    ///
    /// Rows shorter than the longest one are padded with `Empty`.
    pub fn from_rows(rows: &[&str]) -> CubelikeResult<Self> {
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as i32;
        let mut buffer = CellBuffer::new(width, rows.len() as i32);
        for (y, row) in rows.iter().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or_else(|| {
                    CubelikeError::InvalidConfig(format!("unknown cell symbol {symbol:?}"))
                })?;
                buffer.set(Position::new(x as i32, y as i32), cell)?;
            }
        }
        Ok(buffer)
    }

    /// Copies any grid into an owned buffer.
    pub fn snapshot<G: CellGrid + ?Sized>(grid: &G) -> Self {
        let mut buffer = CellBuffer::new(grid.width(), grid.height());
        for pos in grid.positions() {
            let index = buffer.index(pos);
            buffer.cells[index] = grid.get(pos);
        }
        buffer
    }

    /// Consumes the buffer, returning its row-major cells.
    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    fn index(&self, pos: Position) -> usize {
        (pos.y * self.width + pos.x) as usize
    }
}

impl CellGrid for CellBuffer {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn get(&self, pos: Position) -> Cell {
        if self.in_bounds(pos) {
            self.cells[self.index(pos)]
        } else {
            Cell::Empty
        }
    }
}

impl CellGridMut for CellBuffer {
    fn set(&mut self, pos: Position, cell: Cell) -> CubelikeResult<()> {
        if !self.in_bounds(pos) {
            return Err(CubelikeError::OutOfBounds(pos));
        }
        let index = self.index(pos);
        self.cells[index] = cell;
        Ok(())
    }
}
