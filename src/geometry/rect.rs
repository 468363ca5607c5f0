//! # Rectangles
//!
//! Axis-aligned rectangles used for rooms, hub regions and feature search windows.

use super::Position;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle of cells.
///
/// Rooms produced by the tile filler are rectangles in tile-relative coordinates;
/// the dungeon generator translates them into global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner of the rectangle
    pub top_left: Position,
    /// Width in cells
    pub width: u32,
    /// Height in cells
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubelike::{Position, Rect};
    ///
    /// let rect = Rect::new(5, 5, 10, 8);
    /// assert_eq!(rect.top_left, Position::new(5, 5));
    /// assert_eq!(rect.area(), 80);
    /// ```
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            top_left: Position::new(x, y),
            width,
            height,
        }
    }

    /// Left edge (inclusive).
    pub fn x(&self) -> i32 {
        self.top_left.x
    }

    /// Top edge (inclusive).
    pub fn y(&self) -> i32 {
        self.top_left.y
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> i32 {
        self.top_left.x + self.width as i32
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> i32 {
        self.top_left.y + self.height as i32
    }

    /// Gets the area of the rectangle in cells.
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Checks if a position is inside this rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.x() && pos.y >= self.y() && pos.x < self.right() && pos.y < self.bottom()
    }

    /// Checks if this rectangle overlaps another, optionally padded by `buffer`
    /// cells on every side.
    pub fn intersects(&self, other: &Rect, buffer: i32) -> bool {
        !(self.right() <= other.x() - buffer
            || other.right() <= self.x() - buffer
            || self.bottom() <= other.y() - buffer
            || other.bottom() <= self.y() - buffer)
    }

    /// Gets all positions within this rectangle, column by column.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions = Vec::with_capacity(self.area() as usize);
        for x in self.x()..self.right() {
            for y in self.y()..self.bottom() {
                positions.push(Position::new(x, y));
            }
        }
        positions
    }

    /// Gets the ring of positions just outside this rectangle, corners included.
    pub fn border_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for x in (self.x() - 1)..=self.right() {
            positions.push(Position::new(x, self.y() - 1));
            positions.push(Position::new(x, self.bottom()));
        }
        for y in self.y()..self.bottom() {
            positions.push(Position::new(self.x() - 1, y));
            positions.push(Position::new(self.right(), y));
        }
        positions
    }

    /// Returns the smallest rectangle containing every given position, or `None`
    /// when there are none.
    pub fn containing(positions: &[Position]) -> Option<Rect> {
        let first = positions.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for pos in positions {
            min_x = min_x.min(pos.x);
            min_y = min_y.min(pos.y);
            max_x = max_x.max(pos.x);
            max_y = max_y.max(pos.y);
        }
        Some(Rect::new(
            min_x,
            min_y,
            (max_x - min_x + 1) as u32,
            (max_y - min_y + 1) as u32,
        ))
    }

    /// Returns this rectangle shifted by `offset`.
    pub fn translated(&self, offset: Position) -> Rect {
        Rect {
            top_left: self.top_left + offset,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rect_geometry() {
        let rect = Rect::new(5, 5, 10, 8);
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 13);
        assert!(rect.contains(Position::new(5, 5)));
        assert!(rect.contains(Position::new(14, 12)));
        assert!(!rect.contains(Position::new(15, 12)));
        assert!(!rect.contains(Position::new(4, 5)));
    }

    #[test]
    fn test_rect_intersection() {
        let rect1 = Rect::new(5, 5, 10, 8);
        let rect2 = Rect::new(10, 8, 6, 6);
        let rect3 = Rect::new(15, 5, 5, 5); // Touching the right edge

        assert!(rect1.intersects(&rect2, 0));
        assert!(rect2.intersects(&rect1, 0));
        assert!(!rect1.intersects(&rect3, 0));
        assert!(rect1.intersects(&rect3, 1));
    }

    #[test]
    fn test_rect_positions_and_border() {
        let rect = Rect::new(2, 3, 3, 2);
        let inside: HashSet<_> = rect.positions().into_iter().collect();
        let border: HashSet<_> = rect.border_positions().into_iter().collect();

        assert_eq!(inside.len(), 6);
        // 5x4 ring around a 3x2 rectangle
        assert_eq!(border.len(), 5 * 4 - 6);
        assert!(inside.is_disjoint(&border));
        assert!(border.contains(&Position::new(1, 2)));
        assert!(border.contains(&Position::new(5, 5)));
    }

    #[test]
    fn test_rect_containing() {
        assert_eq!(Rect::containing(&[]), None);

        let points = [Position::new(3, 0), Position::new(3, 4), Position::new(4, 3)];
        assert_eq!(Rect::containing(&points), Some(Rect::new(3, 0, 2, 5)));
    }

    #[test]
    fn test_rect_translation() {
        let rect = Rect::new(1, 2, 3, 4).translated(Position::new(12, 24));
        assert_eq!(rect, Rect::new(13, 26, 3, 4));
    }
}
