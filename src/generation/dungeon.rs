//! # Dungeon Generation
//!
//! The end-to-end pipeline: macro layout, per-tile floor and room carving, cleanup,
//! start/exit placement along the macro path, decoration and walls.
//!
//! A single attempt can fail for purely stochastic reasons (too few rooms, no room
//! on the path that fits the start marker, no route to the exit), so
//! [`generate_dungeon`] retries with consecutive seeds.

use crate::generation::cell::{Cell, CellBuffer, CellGrid, CellGridMut};
use crate::generation::feature::{try_to_place_feature_into_rect, Feature};
use crate::generation::features::FeatureCatalog;
use crate::generation::grid_builder::random_partition_grid;
use crate::generation::tile::Tile;
use crate::generation::tile_filler::basic_room_fill;
use crate::generation::tile_grid::TileGrid;
use crate::generation::tile_grid_builder::{add_walls, clean_up_doors, clean_up_dangly_bits};
use crate::generation::{utils, GenerationConfig, Generator};
use crate::utils::shortest_walk;
use crate::{CubelikeError, CubelikeResult, Position, Rect};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Shift from tile-grid coordinates to dungeon coordinates.
const FRAME_OFFSET: Position = Position { x: 1, y: 1 };

/// A finished dungeon.
///
/// The map is one cell wider than the tile grid on every side, so carved space never
/// touches its edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dungeon {
    width: i32,
    height: i32,
    /// Row-major cells
    cells: Vec<Cell>,
    /// Macro cells from start to end
    pub path: Vec<Position>,
    /// Room rectangles in global coordinates
    pub rooms: Vec<Rect>,
    /// Macro cells whose tile received no room although rooms were requested
    pub degraded_tiles: Vec<Position>,
    /// Base seed of the generation run
    pub seed: u64,
    /// Attempt that produced this dungeon; it was generated from `seed + attempt`
    pub attempt: u32,
}

impl Dungeon {
    /// Freezes a grid into a dungeon.
    pub fn from_grid<G: CellGrid + ?Sized>(
        grid: &G,
        path: Vec<Position>,
        rooms: Vec<Rect>,
        degraded_tiles: Vec<Position>,
        seed: u64,
    ) -> Self {
        Self {
            width: grid.width(),
            height: grid.height(),
            cells: CellBuffer::snapshot(grid).into_cells(),
            path,
            rooms,
            degraded_tiles,
            seed,
            attempt: 0,
        }
    }

    /// One string of cell symbols per row.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    /// Every position holding `cell`.
    pub fn positions_of(&self, cell: Cell) -> Vec<Position> {
        self.positions()
            .into_iter()
            .filter(|&pos| self.get(pos) == cell)
            .collect()
    }

    pub fn player_position(&self) -> Option<Position> {
        self.positions_of(Cell::Player).into_iter().next()
    }

    pub fn exit_positions(&self) -> Vec<Position> {
        self.positions_of(Cell::Exit)
    }

    /// Serializes the dungeon as pretty-printed JSON.
    pub fn to_json(&self) -> CubelikeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl CellGrid for Dungeon {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn get(&self, pos: Position) -> Cell {
        if self.in_bounds(pos) {
            self.cells[(pos.y * self.width + pos.x) as usize]
        } else {
            Cell::Empty
        }
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::rendering::TextRenderer::plain().render(self))
    }
}

/// Runs the tile pipeline with a fixed feature catalog.
#[derive(Debug, Clone)]
pub struct DungeonGenerator {
    catalog: FeatureCatalog,
}

impl DungeonGenerator {
    /// Creates a generator with the stock features.
    pub fn new() -> CubelikeResult<Self> {
        Ok(Self::with_catalog(FeatureCatalog::standard()?))
    }

    pub fn with_catalog(catalog: FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Creates a generator using the decorations named in `config`, if any.
    pub fn from_config(config: &GenerationConfig) -> CubelikeResult<Self> {
        let catalog = match &config.decorations {
            Some(definitions) => FeatureCatalog::with_decorations(definitions)?,
            None => FeatureCatalog::standard()?,
        };
        Ok(Self::with_catalog(catalog))
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// Stamps `feature` into the first unused room, walking the path cells in
    /// `order`. The room used is removed from `unused`.
    fn place_along_path<'a>(
        &self,
        feature: &Feature,
        grid: &mut TileGrid,
        order: impl Iterator<Item = &'a Position>,
        rooms_by_cell: &BTreeMap<Position, Vec<Rect>>,
        unused: &mut Vec<Rect>,
        rng: &mut StdRng,
    ) -> CubelikeResult<bool> {
        for cell in order {
            let mut candidates = rooms_by_cell.get(cell).cloned().unwrap_or_default();
            candidates.shuffle(rng);
            for room in candidates {
                let Some(index) = unused.iter().position(|r| *r == room) else {
                    continue;
                };
                if try_to_place_feature_into_rect(feature, grid, room, rng)? {
                    debug!("placed {} in room {:?} of macro cell {cell}", feature.id(), room);
                    unused.remove(index);
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}

impl Generator<Dungeon> for DungeonGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CubelikeResult<Dungeon> {
        config.validate()?;
        let (grid_width, grid_height) = (config.grid_width as i32, config.grid_height as i32);
        let layout = random_partition_grid(
            grid_width,
            grid_height,
            config.start,
            config.end,
            config.prevent_boundary_doors,
            rng,
        )?;

        let mut grid = TileGrid::new(config.grid_width, config.grid_height, config.tile_size);
        let options = config.room_fill_options();
        let mut rooms_by_cell: BTreeMap<Position, Vec<Rect>> = BTreeMap::new();
        let mut all_rooms = Vec::new();
        let mut degraded_tiles = Vec::new();

        for x in 0..grid_width {
            for y in 0..grid_height {
                let cell = Position::new(x, y);
                let partition = layout.partitions.get(cell).ok_or_else(|| {
                    CubelikeError::GenerationFailed(format!("macro cell {cell} has no partition"))
                })?;

                let mut tile = Tile::new(config.tile_size + 1, config.door_offset, config.door_length)?;
                let origin = grid.tile_origin(cell);
                let rooms: Vec<Rect> = basic_room_fill(&mut tile, partition, &options, rng)?
                    .into_iter()
                    .map(|room| room.translated(origin))
                    .collect();

                if rooms.is_empty() && options.min_rooms > 0 {
                    warn!("macro cell {cell} ({partition}) received no rooms");
                    degraded_tiles.push(cell);
                }
                all_rooms.extend(rooms.iter().copied());
                rooms_by_cell.insert(cell, rooms);
                grid.set_tile(cell, tile)?;
            }
        }

        let pruned = clean_up_dangly_bits(&mut grid, None)?;
        let demoted = clean_up_doors(&mut grid)?;
        debug!(
            "{} rooms carved, {pruned} dangling cells pruned, {demoted} doors demoted",
            all_rooms.len()
        );

        if all_rooms.len() < config.min_total_rooms as usize {
            return Err(CubelikeError::GenerationFailed(format!(
                "only {} rooms carved, {} required",
                all_rooms.len(),
                config.min_total_rooms
            )));
        }

        let mut unused = all_rooms.clone();
        let path = &layout.path;
        if !self.place_along_path(&self.catalog.start, &mut grid, path.iter(), &rooms_by_cell, &mut unused, rng)? {
            return Err(CubelikeError::GenerationFailed(
                "failed to place the start anywhere on the path".to_string(),
            ));
        }
        if !self.place_along_path(&self.catalog.exit, &mut grid, path.iter().rev(), &rooms_by_cell, &mut unused, rng)? {
            return Err(CubelikeError::GenerationFailed(
                "failed to place the exit anywhere on the path".to_string(),
            ));
        }

        let mut decorated = 0;
        while let Some(room) = unused.pop() {
            let Some(feature) = self.catalog.random_decoration(rng) else {
                break;
            };
            if rng.gen_bool(config.decoration_chance)
                && try_to_place_feature_into_rect(feature, &mut grid, room, rng)?
            {
                decorated += 1;
            }
        }

        // An empty ring around the map leaves space for walls along its edge
        let mut framed = CellBuffer::new(grid.width() + 2, grid.height() + 2);
        for pos in grid.positions() {
            framed.set(pos + FRAME_OFFSET, grid.get(pos))?;
        }
        let walls = add_walls(&mut framed)?;
        debug!("{decorated} rooms decorated, {walls} walls added");

        let rooms = all_rooms.into_iter().map(|room| room.translated(FRAME_OFFSET)).collect();
        Ok(Dungeon::from_grid(
            &framed,
            layout.path,
            rooms,
            degraded_tiles,
            config.seed,
        ))
    }

    fn validate(&self, dungeon: &Dungeon, _config: &GenerationConfig) -> CubelikeResult<()> {
        let players = dungeon.positions_of(Cell::Player);
        if players.len() != 1 {
            return Err(CubelikeError::GenerationFailed(format!(
                "expected exactly one player, found {}",
                players.len()
            )));
        }
        if dungeon.exit_positions().is_empty() {
            return Err(CubelikeError::GenerationFailed("dungeon has no exit".to_string()));
        }
        if shortest_walk(dungeon, players[0], |pos| dungeon.get(pos) == Cell::Exit).is_none() {
            return Err(CubelikeError::GenerationFailed(format!(
                "no exit is reachable from the player at {}",
                players[0]
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "DungeonGenerator"
    }
}

/// Generates a validated dungeon, retrying with `seed + 1`, `seed + 2`, ... until an
/// attempt succeeds or `config.max_attempts` is used up.
///
/// # Examples
///
/// ```
/// use cubelike::{generate_dungeon, Cell, CellGrid, GenerationConfig};
///
/// let dungeon = generate_dungeon(&GenerationConfig::for_testing(7)).unwrap();
/// assert_eq!(dungeon.count(Cell::Player), 1);
/// assert_eq!(dungeon.path.first(), Some(&cubelike::Position::new(0, 0)));
/// ```
pub fn generate_dungeon(config: &GenerationConfig) -> CubelikeResult<Dungeon> {
    config.validate()?;
    let generator = DungeonGenerator::from_config(config)?;
    let mut last_error = None;

    for attempt in 0..config.max_attempts {
        let attempt_config = GenerationConfig {
            seed: config.seed.wrapping_add(u64::from(attempt)),
            ..config.clone()
        };
        let mut rng = utils::create_rng(&attempt_config);

        let result = generator
            .generate(&attempt_config, &mut rng)
            .and_then(|dungeon| generator.validate(&dungeon, &attempt_config).map(|()| dungeon));

        match result {
            Ok(mut dungeon) => {
                dungeon.seed = config.seed;
                dungeon.attempt = attempt;
                info!(
                    "{} built a {}x{} dungeon with {} rooms on attempt {}",
                    generator.generator_type(),
                    dungeon.width(),
                    dungeon.height(),
                    dungeon.rooms.len(),
                    attempt + 1
                );
                return Ok(dungeon);
            }
            Err(error) => {
                warn!("attempt {} (seed {}) failed: {error}", attempt + 1, attempt_config.seed);
                last_error = Some(error);
            }
        }
    }

    Err(CubelikeError::GenerationFailed(format!(
        "all {} attempts failed; last error: {}",
        config.max_attempts,
        last_error.map_or_else(|| "none".to_string(), |error| error.to_string())
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::features::FeatureDefinition;

    fn dungeon_from_rows(rows: &[&str]) -> Dungeon {
        let grid = CellBuffer::from_rows(rows).unwrap();
        Dungeon::from_grid(&grid, vec![Position::origin()], Vec::new(), Vec::new(), 0)
    }

    #[test]
    fn test_dungeon_queries() {
        let dungeon = dungeon_from_rows(&[
            "xxxxx", //
            "xp.ex", //
            "xxxxx", //
        ]);
        assert_eq!(dungeon.rows(), vec!["xxxxx", "xp.ex", "xxxxx"]);
        assert_eq!(dungeon.player_position(), Some(Position::new(1, 1)));
        assert_eq!(dungeon.exit_positions(), vec![Position::new(3, 1)]);
        assert_eq!(dungeon.get(Position::new(9, 9)), Cell::Empty);
        assert_eq!(dungeon.to_string(), "xxxxx\nxp.ex\nxxxxx\n");
    }

    #[test]
    fn test_validation_rules() {
        let generator = DungeonGenerator::new().unwrap();
        let config = GenerationConfig::for_testing(1);

        let good = dungeon_from_rows(&["xxxxx", "xp.ex", "xxxxx"]);
        assert!(generator.validate(&good, &config).is_ok());

        let walled_off = dungeon_from_rows(&["xxxxx", "xpxex", "xxxxx"]);
        assert!(generator.validate(&walled_off, &config).is_err());

        let two_players = dungeon_from_rows(&["xxxxx", "xppex", "xxxxx"]);
        assert!(generator.validate(&two_players, &config).is_err());

        let no_exit = dungeon_from_rows(&["xxxxx", "xp..x", "xxxxx"]);
        assert!(generator.validate(&no_exit, &config).is_err());
    }

    #[test]
    fn test_generated_dungeon_is_consistent() {
        let config = GenerationConfig::for_testing(12345);
        let dungeon = generate_dungeon(&config).unwrap();

        assert_eq!(dungeon.width(), 38);
        assert_eq!(dungeon.height(), 38);
        assert_eq!(dungeon.path.first(), Some(&Position::new(0, 0)));
        assert_eq!(dungeon.path.last(), Some(&Position::new(2, 2)));
        assert!(dungeon.rooms.len() >= config.min_total_rooms as usize);
        assert!(dungeon.attempt < config.max_attempts);

        let generator = DungeonGenerator::new().unwrap();
        assert!(generator.validate(&dungeon, &config).is_ok());

        for room in &dungeon.rooms {
            for pos in room.positions() {
                assert!(dungeon.get(pos).is_walkable(), "room cell {pos} was not carved");
            }
        }
        for pos in dungeon.positions_of(Cell::Empty) {
            for n in pos.adjacent_positions() {
                assert!(matches!(dungeon.get(n), Cell::Empty | Cell::Wall));
            }
        }
    }

    #[test]
    fn test_map_edge_holds_no_walkable_cells() {
        for seed in 0..10 {
            let dungeon = generate_dungeon(&GenerationConfig::for_detailed_generation(seed)).unwrap();
            let (w, h) = (dungeon.width(), dungeon.height());
            let on_edge: Vec<(Position, Cell)> = dungeon
                .positions()
                .into_iter()
                .filter(|pos| pos.x == 0 || pos.y == 0 || pos.x == w - 1 || pos.y == h - 1)
                .map(|pos| (pos, dungeon.get(pos)))
                .filter(|(_, cell)| cell.is_walkable())
                .collect();
            assert!(on_edge.is_empty(), "seed {seed}: walkable cells on the edge: {on_edge:?}");
        }
    }

    #[test]
    fn test_boundary_doors_are_walled_in() {
        let config = GenerationConfig {
            prevent_boundary_doors: false,
            ..GenerationConfig::for_detailed_generation(3)
        };
        let dungeon = generate_dungeon(&config).unwrap();
        for pos in dungeon.positions_of(Cell::Empty) {
            for n in pos.adjacent_positions() {
                assert!(matches!(dungeon.get(n), Cell::Empty | Cell::Wall), "{n} touches empty {pos}");
            }
        }
        for pos in dungeon.positions() {
            if dungeon.get(pos).is_walkable() {
                for n in pos.adjacent_positions() {
                    assert!(dungeon.in_bounds(n), "walkable {pos} lies on the edge");
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let config = GenerationConfig::for_testing(99);
        assert_eq!(generate_dungeon(&config).unwrap(), generate_dungeon(&config).unwrap());
    }

    #[test]
    fn test_custom_decorations_are_used() {
        let config = GenerationConfig {
            decoration_chance: 1.0,
            decorations: Some(vec![FeatureDefinition::new("gem", &["X"], &["i"], true)]),
            ..GenerationConfig::for_testing(5)
        };
        let dungeon = generate_dungeon(&config).unwrap();
        assert_eq!(dungeon.count(Cell::Chest), 0);
        assert_eq!(dungeon.count(Cell::Monster), 0);
        // Every room but the start and exit rooms gets a gem
        assert_eq!(dungeon.count(Cell::StrayItem), dungeon.rooms.len() - 2);
    }

    #[test]
    fn test_impossible_room_count_exhausts_attempts() {
        let config = GenerationConfig {
            grid_width: 1,
            grid_height: 1,
            start: None,
            end: None,
            min_total_rooms: 100,
            max_attempts: 3,
            ..GenerationConfig::default()
        };
        let error = generate_dungeon(&config).unwrap_err();
        assert!(error.to_string().contains("3 attempts"));
    }
}
