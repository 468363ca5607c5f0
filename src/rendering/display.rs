//! # Text Display
//!
//! Renders any [`CellGrid`] as text, one row per line, optionally colored with ANSI
//! escapes through crossterm.

use crate::generation::cell::{Cell, CellGrid};
use crate::Position;
use crossterm::style::{StyledContent, Stylize};

/// Renders cell grids as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRenderer {
    /// Color doors and markers
    pub colored: bool,
    /// Follow every symbol with a space, which keeps the dump roughly square
    pub spaced: bool,
}

impl TextRenderer {
    /// Uncolored, unspaced output; what `Display` uses.
    pub fn plain() -> Self {
        Self {
            colored: false,
            spaced: false,
        }
    }

    /// Colored, spaced output for terminals.
    pub fn colored() -> Self {
        Self {
            colored: true,
            spaced: true,
        }
    }

    /// Renders every row of `grid`, each terminated by a newline.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubelike::{CellBuffer, TextRenderer};
    ///
    /// let grid = CellBuffer::from_rows(&["x.x", "x0x"]).unwrap();
    /// assert_eq!(TextRenderer::plain().render(&grid), "x.x\nx0x\n");
    /// ```
    pub fn render<G: CellGrid + ?Sized>(&self, grid: &G) -> String {
        let mut out = String::new();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cell = grid.get(Position::new(x, y));
                if self.colored {
                    out.push_str(&style(cell).to_string());
                } else {
                    out.push(cell.symbol());
                }
                if self.spaced {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::plain()
    }
}

/// Doors blue, monsters red, chests magenta, the player and the way in and out
/// green, other markers yellow.
fn style(cell: Cell) -> StyledContent<char> {
    let symbol = cell.symbol();
    match cell {
        Cell::Floor | Cell::Wall | Cell::Empty => symbol.stylize(),
        Cell::Door => symbol.blue().bold(),
        Cell::Monster => symbol.red().bold(),
        Cell::Chest => symbol.magenta().bold(),
        Cell::Player | Cell::Entrance | Cell::Exit => symbol.green().bold(),
        Cell::Npc | Cell::StrayItem | Cell::Special => symbol.yellow().bold(),
    }
}
