//! # Grid Post-Processing
//!
//! Cleanup passes run on the assembled grid: pruning dead-end stubs, demoting doors
//! that are not corridor pinch points, and walling in all carved space.

use crate::generation::cell::{Cell, CellGrid, CellGridMut};
use crate::{CubelikeResult, Position};

/// A non-empty cell with at most one non-empty 4-neighbor.
pub fn is_dangly<G: CellGrid + ?Sized>(grid: &G, pos: Position) -> bool {
    if grid.get(pos) == Cell::Empty {
        return false;
    }
    let filled = pos
        .cardinal_adjacent_positions()
        .into_iter()
        .filter(|&n| grid.get(n) != Cell::Empty)
        .count();
    filled <= 1
}

/// Repeatedly clears dangly cells until none remain, starting from `source` or from
/// every cell of the grid. Returns the number of cleared cells.
pub fn clean_up_dangly_bits<G: CellGridMut + ?Sized>(
    grid: &mut G,
    source: Option<Position>,
) -> CubelikeResult<usize> {
    let mut worklist: Vec<Position> = match source {
        Some(pos) => vec![pos],
        None => grid
            .positions()
            .into_iter()
            .filter(|&pos| is_dangly(grid, pos))
            .collect(),
    };
    worklist.reverse();

    let mut removed = 0;
    while let Some(pos) = worklist.pop() {
        if !grid.in_bounds(pos) || !is_dangly(grid, pos) {
            continue;
        }
        grid.set(pos, Cell::Empty)?;
        removed += 1;
        worklist.extend(pos.cardinal_adjacent_positions());
    }
    Ok(removed)
}

/// A door must sit between two floor cells on one axis and two empty cells on the
/// other.
pub fn is_valid_door_coord<G: CellGrid + ?Sized>(grid: &G, pos: Position) -> bool {
    let at = |dx: i32, dy: i32| grid.get(Position::new(pos.x + dx, pos.y + dy));
    let horizontal = at(-1, 0) == Cell::Floor
        && at(1, 0) == Cell::Floor
        && at(0, -1) == Cell::Empty
        && at(0, 1) == Cell::Empty;
    let vertical = at(0, -1) == Cell::Floor
        && at(0, 1) == Cell::Floor
        && at(-1, 0) == Cell::Empty
        && at(1, 0) == Cell::Empty;
    horizontal || vertical
}

/// Turns every invalid door into floor. Returns the number of demoted doors.
pub fn clean_up_doors<G: CellGridMut + ?Sized>(grid: &mut G) -> CubelikeResult<usize> {
    let mut demoted = 0;
    for pos in grid.positions() {
        if grid.get(pos) == Cell::Door && !is_valid_door_coord(grid, pos) {
            grid.set(pos, Cell::Floor)?;
            demoted += 1;
        }
    }
    Ok(demoted)
}

/// Walls every empty cell touching carved space, diagonals included. Returns the
/// number of walls added.
pub fn add_walls<G: CellGridMut + ?Sized>(grid: &mut G) -> CubelikeResult<usize> {
    let needs_wall: Vec<Position> = grid
        .positions()
        .into_iter()
        .filter(|&pos| {
            grid.get(pos) == Cell::Empty
                && pos
                    .adjacent_positions()
                    .into_iter()
                    .any(|n| grid.get(n) != Cell::Empty)
        })
        .collect();

    for &pos in &needs_wall {
        grid.set(pos, Cell::Wall)?;
    }
    Ok(needs_wall.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::cell::CellBuffer;
    use proptest::prelude::*;

    fn rows(grid: &CellBuffer) -> Vec<String> {
        (0..grid.height())
            .map(|y| (0..grid.width()).map(|x| grid.get(Position::new(x, y)).symbol()).collect())
            .collect()
    }

    #[test]
    fn test_dangly_stub_is_pruned_recursively() {
        let mut grid = CellBuffer::from_rows(&[
            "       ", //
            " ...   ", //
            " ..... ", //
            " ...   ", //
            "       ", //
        ])
        .unwrap();
        assert!(is_dangly(&grid, Position::new(5, 2)));
        assert!(!is_dangly(&grid, Position::new(2, 2)));
        assert!(!is_dangly(&grid, Position::new(0, 0)));

        let removed = clean_up_dangly_bits(&mut grid, None).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(rows(&grid)[2], " ...   ");
    }

    #[test]
    fn test_isolated_corridor_disappears_entirely() {
        let mut grid = CellBuffer::from_rows(&[" 0...0 "]).unwrap();
        assert_eq!(clean_up_dangly_bits(&mut grid, None).unwrap(), 5);
        assert_eq!(grid.count(Cell::Empty), 7);
    }

    #[test]
    fn test_seeded_cleanup_only_touches_reachable_stubs() {
        let mut grid = CellBuffer::from_rows(&[
            ".. ..", //
            "     ", //
            ".   .", //
        ])
        .unwrap();
        let removed = clean_up_dangly_bits(&mut grid, Some(Position::new(0, 0))).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(rows(&grid), vec!["   ..", "     ", ".   ."]);
    }

    #[test]
    fn test_door_validation() {
        let mut grid = CellBuffer::from_rows(&[
            "    . ", //
            ".0. 0 ", //
            "    . ", //
            " 0.   ", //
        ])
        .unwrap();
        assert!(is_valid_door_coord(&grid, Position::new(1, 1)));
        assert!(is_valid_door_coord(&grid, Position::new(4, 1)));
        assert!(!is_valid_door_coord(&grid, Position::new(1, 3)));

        assert_eq!(clean_up_doors(&mut grid).unwrap(), 1);
        assert_eq!(grid.get(Position::new(1, 3)), Cell::Floor);
        assert_eq!(grid.count(Cell::Door), 2);
    }

    #[test]
    fn test_walls_surround_carved_space() {
        let mut grid = CellBuffer::from_rows(&[
            "     ", //
            "  .  ", //
            "     ", //
            "     ", //
        ])
        .unwrap();
        assert_eq!(add_walls(&mut grid).unwrap(), 8);
        assert_eq!(rows(&grid), vec![" xxx ", " x.x ", " xxx ", "     "]);
    }

    fn arbitrary_grid() -> impl Strategy<Value = CellBuffer> {
        prop::collection::vec(prop::sample::select(vec![' ', ' ', '.', '0', 'm']), 64).prop_map(|symbols| {
            let text: String = symbols.into_iter().collect();
            let rows: Vec<&str> = (0..8).map(|r| &text[r * 8..r * 8 + 8]).collect();
            CellBuffer::from_rows(&rows).unwrap()
        })
    }

    proptest! {
        #[test]
        fn walls_leave_no_exposed_carving(mut grid in arbitrary_grid()) {
            add_walls(&mut grid).unwrap();
            for pos in grid.positions() {
                if grid.get(pos) == Cell::Empty {
                    for n in pos.adjacent_positions() {
                        prop_assert!(matches!(grid.get(n), Cell::Empty | Cell::Wall));
                    }
                }
            }
        }

        #[test]
        fn remaining_doors_are_pinch_points(mut grid in arbitrary_grid()) {
            clean_up_doors(&mut grid).unwrap();
            for pos in grid.positions() {
                if grid.get(pos) == Cell::Door {
                    prop_assert!(is_valid_door_coord(&grid, pos));
                }
            }
        }

        #[test]
        fn no_dangly_cells_survive_cleanup(mut grid in arbitrary_grid()) {
            clean_up_dangly_bits(&mut grid, None).unwrap();
            for pos in grid.positions() {
                prop_assert!(!is_dangly(&grid, pos));
            }
        }
    }
}
