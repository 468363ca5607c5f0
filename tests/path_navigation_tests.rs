//! Integration tests for walkability between the start and the exit of generated dungeons.

use cubelike::utils::{flood_fill, is_reachable, shortest_walk};
use cubelike::{generate_dungeon, Cell, CellGrid, CubelikeResult, Dungeon, GenerationConfig};

fn generated(seed: u64) -> CubelikeResult<Dungeon> {
    generate_dungeon(&GenerationConfig::for_testing(seed))
}

#[test]
fn test_exit_reachable_from_player() -> CubelikeResult<()> {
    for seed in [1, 7, 98765] {
        let dungeon = generated(seed)?;
        let player = dungeon.player_position().expect("dungeon should have a player");

        let reachable = dungeon
            .exit_positions()
            .into_iter()
            .any(|exit| is_reachable(&dungeon, player, exit));
        assert!(reachable, "seed {seed}: no exit reachable from {player}");
    }
    Ok(())
}

#[test]
fn test_shortest_walk_only_crosses_walkable_cells() -> CubelikeResult<()> {
    let dungeon = generated(2024)?;
    let player = dungeon.player_position().expect("dungeon should have a player");

    let walk = shortest_walk(&dungeon, player, |pos| dungeon.get(pos) == Cell::Exit)
        .expect("the exit should be reachable");
    assert_eq!(walk.first(), Some(&player));
    assert_eq!(dungeon.get(*walk.last().unwrap()), Cell::Exit);

    for step in walk.windows(2) {
        assert_eq!(step[0].manhattan_distance(step[1]), 1);
        assert!(dungeon.get(step[1]).is_walkable());
    }
    Ok(())
}

#[test]
fn test_walls_enclose_the_walkable_region() -> CubelikeResult<()> {
    let dungeon = generated(31337)?;
    let player = dungeon.player_position().expect("dungeon should have a player");

    let region = flood_fill(&dungeon, player, |cell| cell != Cell::Wall && cell != Cell::Empty);
    assert!(region.len() > 1);
    for pos in &region {
        for neighbor in pos.adjacent_positions() {
            assert!(dungeon.in_bounds(neighbor), "carved cell {pos} lies on the map edge");
            assert_ne!(
                dungeon.get(neighbor),
                Cell::Empty,
                "carved cell {pos} touches empty space at {neighbor}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_macro_path_is_contiguous() -> CubelikeResult<()> {
    let dungeon = generated(55)?;
    assert!(!dungeon.path.is_empty());
    for step in dungeon.path.windows(2) {
        assert_eq!(step[0].manhattan_distance(step[1]), 1);
    }
    let mut unique = dungeon.path.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), dungeon.path.len());
    Ok(())
}
