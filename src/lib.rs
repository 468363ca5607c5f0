//! # Cubelike Dungeon Generator
//!
//! Constraint-driven procedural dungeon generation for the Cubelike action roguelike.
//!
//! ## Architecture Overview
//!
//! Generation runs as a pipeline over two levels of grid:
//!
//! - **Macro grid**: a coarse grid of tiles. Every tile gets a [`Partition`] that says
//!   which of its 8 door slots are open and which of them connect to each other.
//!   Neighboring partitions must agree on every shared door.
//! - **Tile grid**: every tile is expanded into a character grid realizing its
//!   partition, rooms are carved without changing that connectivity, and the tiles
//!   are stitched into one [`TileGrid`].
//!
//! After assembly the grid is cleaned up (dead ends pruned, fake doors downgraded),
//! features such as the start, the exit, monster nests and chests are stamped onto
//! the rooms, and walls are grown around everything that was carved.
//!
//! The result is a [`Dungeon`]: a grid of [`Cell`] values plus the macro path and the
//! room rectangles. Turning markers into real entities is left to the game.

pub mod generation;
pub mod geometry;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use generation::*;
pub use geometry::*;
pub use rendering::*;

/// Core error type for the Cubelike generator.
#[derive(thiserror::Error, Debug)]
pub enum CubelikeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Generation parameters are inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A door grouping is malformed or violates the partition rules
    #[error("Invalid partition: {0}")]
    InvalidPartition(String),

    /// Door constraints contradict each other
    #[error("Conflicting door constraints: {0}")]
    ConflictingConstraints(String),

    /// Partition rejection sampling did not converge
    #[error("Partition sampling gave up after {attempts} attempts")]
    PartitionSamplingExhausted { attempts: u32 },

    /// No path exists between two macro cells
    #[error("Failed to find path: start={start}, end={end}, width={width}, height={height}")]
    PathNotFound {
        start: geometry::Position,
        end: geometry::Position,
        width: i32,
        height: i32,
    },

    /// No toggle combination realized the requested partition
    #[error("Floor fill failed: {0}")]
    FloorFillFailed(String),

    /// The floor fill search space is too large
    #[error("Too many toggle zones: {zones} (limit {limit})")]
    TooManyToggleZones { zones: usize, limit: usize },

    /// A feature definition is malformed
    #[error("Invalid feature {id}: {reason}")]
    MalformedFeature { id: String, reason: String },

    /// A write landed outside a grid
    #[error("Position out of bounds: {0}")]
    OutOfBounds(geometry::Position),

    /// A write landed in a tile grid slot that has no tile
    #[error("No tile at {0}")]
    MissingTile(geometry::Position),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Cubelike codebase.
pub type CubelikeResult<T> = Result<T, CubelikeError>;

/// Version information for the generator.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation constants.
pub mod config {
    /// Number of door slots on every tile
    pub const DOOR_COUNT: usize = 8;

    /// Cap on rejection-sampling rounds in `Partition::random`
    pub const MAX_PARTITION_ATTEMPTS: u32 = 10_000;

    /// Cap on toggle zones in the floor fill search (2^12 combinations)
    pub const MAX_TOGGLE_ZONES: usize = 12;

    /// Default tile stride in cells
    pub const DEFAULT_TILE_SIZE: u32 = 12;

    /// Default number of whole-pipeline attempts
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 32;
}
