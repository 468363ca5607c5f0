//! # Features
//!
//! Fixed-shape stamps placed by pattern matching. A feature has a replace mask that
//! must match the grid exactly (wildcards aside) and a place mask of the same shape
//! that is written over the match.

use crate::generation::cell::{Cell, CellGrid, CellGridMut};
use crate::{CubelikeError, CubelikeResult, Position, Rect};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fmt;

/// One row of a mask; `None` is a wildcard.
pub type MaskRow = Vec<Option<Cell>>;

/// A pattern-matched stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    id: String,
    replace: Vec<MaskRow>,
    place: Vec<MaskRow>,
    can_rotate: bool,
}

/// Converts one pattern character. `X` is floor, `.` is empty and `?` matches
/// anything; marker letters and the wall/door symbols stand for themselves.
fn pattern_cell(symbol: char) -> Option<Option<Cell>> {
    match symbol {
        '?' => Some(None),
        'X' => Some(Some(Cell::Floor)),
        '.' => Some(Some(Cell::Empty)),
        other => Cell::from_symbol(other).map(Some),
    }
}

fn pattern_symbol(cell: Option<Cell>) -> char {
    match cell {
        None => '?',
        Some(Cell::Floor) => 'X',
        Some(Cell::Empty) => '.',
        Some(other) => other.symbol(),
    }
}

impl Feature {
    /// Creates a feature from two masks of identical, non-empty, rectangular shape.
    pub fn new(
        id: impl Into<String>,
        replace: Vec<MaskRow>,
        place: Vec<MaskRow>,
        can_rotate: bool,
    ) -> CubelikeResult<Self> {
        let id = id.into();
        let malformed = |reason: String| CubelikeError::MalformedFeature {
            id: id.clone(),
            reason,
        };

        let width = replace.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(malformed("empty replace mask".to_string()));
        }
        if let Some(row) = replace.iter().position(|row| row.len() != width) {
            return Err(malformed(format!("replace row {row} is not {width} wide")));
        }
        if place.len() != replace.len() {
            return Err(malformed(format!(
                "mismatched place/replace heights {} != {}",
                place.len(),
                replace.len()
            )));
        }
        if let Some(row) = place.iter().position(|row| row.len() != width) {
            return Err(malformed(format!("place row {row} is not {width} wide")));
        }

        Ok(Self {
            id,
            replace,
            place,
            can_rotate,
        })
    }

    /// Creates a feature from text rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubelike::{Cell, Feature};
    ///
    /// let chest = Feature::from_patterns("chest", &["XXX", "XXX"], &["XcX", "XXX"], true).unwrap();
    /// assert_eq!((chest.width(), chest.height()), (3, 2));
    /// assert_eq!(chest.place_at(1, 0), Some(Cell::Chest));
    /// assert!(Feature::from_patterns("bad", &["XX", "X"], &["XX", "X"], true).is_err());
    /// ```
    pub fn from_patterns<S: AsRef<str>>(
        id: &str,
        replace: &[S],
        place: &[S],
        can_rotate: bool,
    ) -> CubelikeResult<Self> {
        let convert = |rows: &[S]| -> CubelikeResult<Vec<MaskRow>> {
            rows.iter()
                .map(|row| {
                    row.as_ref()
                        .chars()
                        .map(|symbol| {
                            pattern_cell(symbol).ok_or_else(|| CubelikeError::MalformedFeature {
                                id: id.to_string(),
                                reason: format!("unknown pattern character {symbol:?}"),
                            })
                        })
                        .collect()
                })
                .collect()
        };
        Self::new(id, convert(replace)?, convert(place)?, can_rotate)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn can_rotate(&self) -> bool {
        self.can_rotate
    }

    pub fn width(&self) -> i32 {
        self.replace[0].len() as i32
    }

    pub fn height(&self) -> i32 {
        self.replace.len() as i32
    }

    /// The replace mask value at feature coordinates; outside reads as `Empty`.
    pub fn replace_at(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return Some(Cell::Empty);
        }
        self.replace[y as usize][x as usize]
    }

    /// The place mask value at feature coordinates.
    pub fn place_at(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        self.place[y as usize][x as usize]
    }

    /// Returns a copy turned `turns` quarter turns clockwise.
    pub fn rotated(&self, turns: u32) -> CubelikeResult<Feature> {
        if turns > 0 && !self.can_rotate {
            return Err(CubelikeError::MalformedFeature {
                id: self.id.clone(),
                reason: "feature cannot be rotated".to_string(),
            });
        }

        let mut feature = self.clone();
        for _ in 0..turns {
            feature.replace = rotate_clockwise(&feature.replace);
            feature.place = rotate_clockwise(&feature.place);
        }
        Ok(feature)
    }

    /// Checks whether the replace mask matches `grid` with the feature's top-left
    /// corner at `origin`. Cells the feature would fill must lie inside the grid.
    pub fn can_place_at<G: CellGrid + ?Sized>(&self, grid: &G, origin: Position) -> bool {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let pos = Position::new(origin.x + x, origin.y + y);
                if let Some(expected) = self.replace_at(x, y) {
                    if grid.get(pos) != expected {
                        return false;
                    }
                }
                if matches!(self.place_at(x, y), Some(cell) if cell != Cell::Empty) && !grid.in_bounds(pos) {
                    return false;
                }
            }
        }
        true
    }

    /// Writes the place mask at `origin`, skipping wildcards.
    ///
    /// Empty cells outside the grid are skipped too: they already read as empty.
    pub fn write_into<G: CellGridMut + ?Sized>(&self, grid: &mut G, origin: Position) -> CubelikeResult<()> {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let pos = Position::new(origin.x + x, origin.y + y);
                match self.place_at(x, y) {
                    Some(Cell::Empty) if !grid.in_bounds(pos) => {}
                    Some(cell) => grid.set(pos, cell)?,
                    None => {}
                }
            }
        }
        Ok(())
    }
}

fn rotate_clockwise(mask: &[MaskRow]) -> Vec<MaskRow> {
    let height = mask.len();
    let width = mask.first().map_or(0, Vec::len);
    (0..width)
        .map(|column| (0..height).rev().map(|row| mask[row][column]).collect())
        .collect()
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = |mask: &[MaskRow]| -> Vec<String> {
            mask.iter()
                .map(|row| row.iter().map(|&cell| pattern_symbol(cell)).collect())
                .collect()
        };
        write!(
            f,
            "Feature:[{}, replace={:?}, place={:?}]",
            self.id,
            text(&self.replace),
            text(&self.place)
        )
    }
}

/// Every offset at which `feature` fits on `grid` with its bounding box overlapping
/// `rect`.
pub fn all_possible_placements_overlapping_rect<G: CellGrid + ?Sized>(
    feature: &Feature,
    grid: &G,
    rect: Rect,
) -> Vec<Position> {
    let mut placements = Vec::new();
    for x in (rect.x() - feature.width() + 1)..rect.right() {
        for y in (rect.y() - feature.height() + 1)..rect.bottom() {
            let origin = Position::new(x, y);
            if feature.can_place_at(grid, origin) {
                placements.push(origin);
            }
        }
    }
    placements
}

/// Stamps `feature` somewhere overlapping `rect`.
///
/// Rotations are tried in random order (only the identity for fixed features); the
/// first rotation that fits anywhere is written at a uniformly chosen placement.
/// Returns `Ok(false)` when nothing fits.
pub fn try_to_place_feature_into_rect<G: CellGridMut + ?Sized>(
    feature: &Feature,
    grid: &mut G,
    rect: Rect,
    rng: &mut StdRng,
) -> CubelikeResult<bool> {
    let mut turns: Vec<u32> = if feature.can_rotate() { vec![0, 1, 2, 3] } else { vec![0] };
    turns.shuffle(rng);

    for turn in turns {
        let rotated = feature.rotated(turn)?;
        let placements = all_possible_placements_overlapping_rect(&rotated, &*grid, rect);
        if let Some(&origin) = placements.choose(rng) {
            rotated.write_into(grid, origin)?;
            return Ok(true);
        }
    }
    Ok(false)
}
