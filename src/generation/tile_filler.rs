//! # Tile Filling
//!
//! Turns a partition into floor topology. Doors are joined to their corner hubs,
//! then the optional zones (hub-to-hub connections and hubs without doors) are
//! toggled by brute force until the carved grid realizes exactly the requested
//! partition. Rooms are carved afterwards, each one kept only if it leaves the
//! realized partition unchanged.

use crate::config::{DOOR_COUNT, MAX_TOGGLE_ZONES};
use crate::generation::cell::{Cell, CellGrid, CellGridMut};
use crate::generation::partition::{DoorSlot, Partition};
use crate::generation::tile::Tile;
use crate::utils::{bit_is_set, flood_fill, toggle_combinations};
use crate::{CubelikeError, CubelikeResult, Position, Rect};
use log::trace;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Parameters for [`basic_room_fill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFillOptions {
    /// Lower bound of the random room-count target
    pub min_rooms: u32,
    /// Upper bound of the random room-count target
    pub max_rooms: u32,
    /// Number of random placements tried before giving up
    pub iteration_limit: u32,
    /// Minimum room side
    pub min_size: u32,
    /// Maximum room side
    pub max_size: u32,
    /// Reject rooms overlapping an accepted room
    pub disjoint: bool,
    /// Reject rooms that touch nothing carved
    pub connected: bool,
}

impl Default for RoomFillOptions {
    fn default() -> Self {
        Self {
            min_rooms: 1,
            max_rooms: 4,
            iteration_limit: 300,
            min_size: 3,
            max_size: 6,
            disjoint: true,
            connected: true,
        }
    }
}

/// Derives the partition a tile actually realizes.
///
/// Each door slot is flood filled from its first cell over doors and floor; slots
/// whose first cells land in the same region form a group.
pub fn calculate_partition(tile: &Tile) -> Partition {
    let firsts: Vec<Position> = (0..DOOR_COUNT).map(|door| tile.door_coords(door)[0]).collect();
    let mut remaining: Vec<DoorSlot> = (0..DOOR_COUNT).collect();
    let mut groups = Vec::new();

    while !remaining.is_empty() {
        let door = remaining.remove(0);
        let region = flood_fill(tile, firsts[door], Cell::conducts);
        if region.is_empty() {
            continue;
        }
        let mut group = vec![door];
        remaining.retain(|&other| {
            if region.contains(&firsts[other]) {
                group.push(other);
                false
            } else {
                true
            }
        });
        groups.push(group);
    }

    Partition::from_disjoint_groups(groups)
}

/// Clears the tile and writes the open doors of `partition`.
pub fn basic_door_fill(tile: &mut Tile, partition: &Partition) -> CubelikeResult<()> {
    tile.clear();
    for door in partition.doors() {
        for pos in tile.door_coords(door) {
            tile.set(pos, Cell::Door)?;
        }
    }
    Ok(())
}

/// Carves floor so that the tile realizes `partition`.
///
/// Fails on an invalid partition, when the toggle search would be too large, or
/// when no toggle combination realizes the partition.
pub fn basic_floor_fill(tile: &mut Tile, partition: &Partition, rng: &mut StdRng) -> CubelikeResult<()> {
    if !partition.is_valid() {
        return Err(CubelikeError::InvalidPartition(format!(
            "cannot fill a tile with {partition}"
        )));
    }

    basic_door_fill(tile, partition)?;

    let mut hub_filled = [false; 4];
    for door in partition.doors() {
        let mut run = tile.door_coords(door);
        run.extend(tile.hub_coords(door));
        if let Some(rect) = Rect::containing(&run) {
            for pos in rect.positions() {
                tile.replace(pos, Cell::Empty, Cell::Floor)?;
            }
        }
        hub_filled[Tile::corner_of(door)] = true;
    }

    let mut zones: Vec<Vec<Position>> = (0..4).map(|n| tile.hub_connection_coords(n)).collect();
    for (corner, filled) in hub_filled.into_iter().enumerate() {
        if !filled {
            zones.push(tile.corner_hub_coords(corner));
        }
    }
    if zones.len() > MAX_TOGGLE_ZONES {
        return Err(CubelikeError::TooManyToggleZones {
            zones: zones.len(),
            limit: MAX_TOGGLE_ZONES,
        });
    }

    for mask in toggle_combinations(zones.len(), rng) {
        for (index, zone) in zones.iter().enumerate() {
            let cell = if bit_is_set(mask, index) {
                Cell::Floor
            } else {
                Cell::Empty
            };
            for &pos in zone {
                tile.set(pos, cell)?;
            }
        }
        if calculate_partition(tile) == *partition {
            trace!("realized {partition} with toggle mask {mask:#b}");
            return Ok(());
        }
    }

    Err(CubelikeError::FloorFillFailed(format!(
        "no toggle combination realizes {partition}"
    )))
}

/// Carves `room` into the empty cells of the tile, keeping it only if the tile still
/// realizes `partition`. A rejected room leaves the tile untouched.
pub fn try_carve_room(tile: &mut Tile, partition: &Partition, room: Rect) -> CubelikeResult<bool> {
    let mut carved = Vec::new();
    for pos in room.positions() {
        if tile.replace(pos, Cell::Empty, Cell::Floor)? {
            carved.push(pos);
        }
    }

    if calculate_partition(tile) == *partition {
        return Ok(true);
    }

    for pos in carved {
        tile.set(pos, Cell::Empty)?;
    }
    Ok(false)
}

/// Fills the floor for `partition`, then carves random rooms.
///
/// Returns the accepted rooms in tile coordinates. Fewer rooms than requested (even
/// none) is a normal outcome.
pub fn basic_room_fill(
    tile: &mut Tile,
    partition: &Partition,
    options: &RoomFillOptions,
    rng: &mut StdRng,
) -> CubelikeResult<Vec<Rect>> {
    if options.min_rooms > options.max_rooms || options.min_size > options.max_size {
        return Err(CubelikeError::InvalidConfig(format!(
            "inconsistent room bounds: {options:?}"
        )));
    }

    basic_floor_fill(tile, partition, rng)?;

    let mut wanted = rng.gen_range(options.min_rooms..=options.max_rooms);
    let mut rooms: Vec<Rect> = Vec::new();
    let mut iteration = 0;

    while wanted > 0 && iteration < options.iteration_limit {
        iteration += 1;
        let width = rng.gen_range(options.min_size..=options.max_size) as i32;
        let height = rng.gen_range(options.min_size..=options.max_size) as i32;
        let max_x = tile.size() - width - 2;
        let max_y = tile.size() - height - 2;
        if max_x < 1 || max_y < 1 {
            continue;
        }
        let room = Rect::new(
            rng.gen_range(1..=max_x),
            rng.gen_range(1..=max_y),
            width as u32,
            height as u32,
        );

        if options.disjoint && rooms.iter().any(|placed| room.intersects(placed, 0)) {
            continue;
        }
        if options.connected
            && !room
                .border_positions()
                .into_iter()
                .any(|pos| tile.get(pos).is_carved())
        {
            continue;
        }

        if try_carve_room(tile, partition, room)? {
            rooms.push(room);
            wanted -= 1;
        }
    }

    Ok(rooms)
}
