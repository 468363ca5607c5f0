//! Integration tests for loading generation configs from disk.

use cubelike::{
    generate_dungeon, Cell, CellGrid, CubelikeError, CubelikeResult, Dungeon, FeatureDefinition,
    GenerationConfig,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_file_round_trip() -> CubelikeResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("dungeon.json");

    let config = GenerationConfig {
        decoration_chance: 0.5,
        ..GenerationConfig::for_detailed_generation(99)
    };
    fs::write(&path, serde_json::to_string_pretty(&config)?)?;

    let loaded = GenerationConfig::from_json_file(&path)?;
    assert_eq!(loaded, config);
    Ok(())
}

#[test]
fn test_partial_config_uses_defaults() -> CubelikeResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("partial.json");
    fs::write(&path, r#"{ "seed": 5, "grid_width": 2, "grid_height": 2 }"#)?;

    let loaded = GenerationConfig::from_json_file(&path)?;
    let defaults = GenerationConfig::default();
    assert_eq!(loaded.seed, 5);
    assert_eq!(loaded.grid_width, 2);
    assert_eq!(loaded.tile_size, defaults.tile_size);
    assert_eq!(loaded.max_attempts, defaults.max_attempts);
    Ok(())
}

#[test]
fn test_invalid_config_file_is_rejected() -> CubelikeResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bad.json");
    fs::write(&path, r#"{ "grid_width": 0 }"#)?;

    let result = GenerationConfig::from_json_file(&path);
    assert!(matches!(result, Err(CubelikeError::InvalidConfig(_))));

    let missing = GenerationConfig::from_json_file(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(CubelikeError::Io(_))));
    Ok(())
}

#[test]
fn test_custom_decorations_from_file() -> CubelikeResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("gems.json");

    let config = GenerationConfig {
        decorations: Some(vec![FeatureDefinition::new("gem", &["X"], &["i"], true)]),
        decoration_chance: 1.0,
        ..GenerationConfig::for_testing(4)
    };
    fs::write(&path, serde_json::to_string(&config)?)?;

    let dungeon = generate_dungeon(&GenerationConfig::from_json_file(&path)?)?;
    assert_eq!(dungeon.count(Cell::Chest), 0);
    assert_eq!(dungeon.count(Cell::Monster), 0);
    assert_eq!(dungeon.count(Cell::StrayItem), dungeon.rooms.len() - 2);
    Ok(())
}

#[test]
fn test_dungeon_json_export() -> CubelikeResult<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("dungeon.json");

    let dungeon = generate_dungeon(&GenerationConfig::for_testing(8))?;
    fs::write(&path, dungeon.to_json()?)?;

    let restored: Dungeon = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(restored, dungeon);
    assert_eq!(restored.to_string(), dungeon.to_string());
    Ok(())
}
