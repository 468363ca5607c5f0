//! # Generation Module
//!
//! Constraint-driven dungeon generation.
//!
//! A dungeon is built in layers. A macro grid of [`Partition`]s decides which doors
//! every tile opens and how they connect; each tile is then carved so that its floor
//! realizes exactly that connectivity, rooms are added without changing it, and the
//! assembled [`TileGrid`] is cleaned, decorated with [`Feature`]s and walled.

pub mod cell;
pub mod dungeon;
pub mod feature;
pub mod features;
pub mod grid_builder;
pub mod partition;
pub mod partition_grid;
pub mod tile;
pub mod tile_filler;
pub mod tile_grid;
pub mod tile_grid_builder;

pub use cell::*;
pub use dungeon::*;
pub use feature::*;
pub use features::*;
pub use grid_builder::*;
pub use partition::*;
pub use partition_grid::*;
pub use tile::*;
pub use tile_filler::*;
pub use tile_grid::*;
pub use tile_grid_builder::*;

use crate::config::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TILE_SIZE};
use crate::{CubelikeError, CubelikeResult, Position};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for dungeon generation.
///
/// Every field has a default, so a JSON config only needs the fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Macro grid width in tiles
    pub grid_width: u32,
    /// Macro grid height in tiles
    pub grid_height: u32,
    /// Macro cell where the path starts; random when unset
    pub start: Option<Position>,
    /// Macro cell where the path ends; random when unset
    pub end: Option<Position>,
    /// Distance between neighboring tile origins, in cells
    pub tile_size: u32,
    /// Distance of each door run from its nearest tile corner
    pub door_offset: u32,
    /// Length of each door run
    pub door_length: u32,
    /// Close every door facing the map boundary
    pub prevent_boundary_doors: bool,
    /// Minimum room-count target per tile
    pub min_rooms_per_tile: u32,
    /// Maximum room-count target per tile
    pub max_rooms_per_tile: u32,
    /// Random room placements tried per tile
    pub room_iteration_limit: u32,
    /// Minimum room side
    pub min_room_size: u32,
    /// Maximum room side
    pub max_room_size: u32,
    /// Keep rooms within a tile from overlapping
    pub disjoint_rooms: bool,
    /// Only accept rooms touching already carved space
    pub connected_rooms: bool,
    /// Fewer rooms than this fails the attempt
    pub min_total_rooms: u32,
    /// Probability that a leftover room gets a decoration (0.0 to 1.0)
    pub decoration_chance: f64,
    /// Seeds tried by [`generate_dungeon`] before giving up
    pub max_attempts: u32,
    /// Replaces the stock decoration list when set
    pub decorations: Option<Vec<FeatureDefinition>>,
}

impl GenerationConfig {
    /// Creates the standard configuration for a seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cubelike::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.min_room_size <= config.max_room_size);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            grid_width: 4,
            grid_height: 3,
            start: None,
            end: None,
            tile_size: DEFAULT_TILE_SIZE,
            door_offset: 3,
            door_length: 1,
            prevent_boundary_doors: true,
            min_rooms_per_tile: 1,
            max_rooms_per_tile: 4,
            room_iteration_limit: 300,
            min_room_size: 3,
            max_room_size: 6,
            disjoint_rooms: true,
            connected_rooms: true,
            min_total_rooms: 4,
            decoration_chance: 0.667,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            decorations: None,
        }
    }

    /// Creates a small 3x3 configuration running corner to corner.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            grid_width: 3,
            grid_height: 3,
            start: Some(Position::new(0, 0)),
            end: Some(Position::new(2, 2)),
            ..Self::new(seed)
        }
    }

    /// Creates a configuration for larger maps with bigger tiles and rooms.
    pub fn for_detailed_generation(seed: u64) -> Self {
        Self {
            grid_width: 6,
            grid_height: 5,
            tile_size: 16,
            door_length: 2,
            max_rooms_per_tile: 5,
            max_room_size: 8,
            min_total_rooms: 8,
            ..Self::new(seed)
        }
    }

    /// Loads a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> CubelikeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> CubelikeResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameters that cannot produce a dungeon.
    pub fn validate(&self) -> CubelikeResult<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(CubelikeError::InvalidConfig(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        for cell in [self.start, self.end].into_iter().flatten() {
            if cell.x < 0
                || cell.y < 0
                || cell.x >= self.grid_width as i32
                || cell.y >= self.grid_height as i32
            {
                return Err(CubelikeError::InvalidConfig(format!(
                    "macro cell {cell} lies outside the {}x{} grid",
                    self.grid_width, self.grid_height
                )));
            }
        }

        // Tiles are one cell larger than the stride
        Tile::new(self.tile_size + 1, self.door_offset, self.door_length)?;

        if self.min_rooms_per_tile > self.max_rooms_per_tile {
            return Err(CubelikeError::InvalidConfig(format!(
                "min_rooms_per_tile ({}) exceeds max_rooms_per_tile ({})",
                self.min_rooms_per_tile, self.max_rooms_per_tile
            )));
        }
        if self.min_room_size == 0 || self.min_room_size > self.max_room_size {
            return Err(CubelikeError::InvalidConfig(format!(
                "invalid room size range {}..={}",
                self.min_room_size, self.max_room_size
            )));
        }
        if self.min_room_size + 2 > self.tile_size {
            return Err(CubelikeError::InvalidConfig(format!(
                "rooms of size {} do not fit into tiles of size {}",
                self.min_room_size, self.tile_size
            )));
        }
        if !(0.0..=1.0).contains(&self.decoration_chance) {
            return Err(CubelikeError::InvalidConfig(format!(
                "decoration_chance must be within 0.0..=1.0, got {}",
                self.decoration_chance
            )));
        }
        if self.max_attempts == 0 {
            return Err(CubelikeError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Room placement parameters for a single tile.
    pub fn room_fill_options(&self) -> RoomFillOptions {
        RoomFillOptions {
            min_rooms: self.min_rooms_per_tile,
            max_rooms: self.max_rooms_per_tile,
            iteration_limit: self.room_iteration_limit,
            min_size: self.min_room_size,
            max_size: self.max_room_size,
            disjoint: self.disjoint_rooms,
            connected: self.connected_rooms,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CubelikeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CubelikeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}
