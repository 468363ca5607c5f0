//! # Door Partitions
//!
//! A partition describes a tile's required connectivity: which of its 8 door slots
//! are open, and which open doors must be reachable from each other.
//!
//! Slots are numbered clockwise from the left slot of the top side:
//!
//! ```text
//!      0   1
//!    7       2
//!    6       3
//!      5   4
//! ```

use crate::config::{DOOR_COUNT, MAX_PARTITION_ATTEMPTS};
use crate::{CubelikeError, CubelikeResult};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of one of a tile's 8 door slots.
pub type DoorSlot = usize;

/// Door pairs sharing a corner of the tile.
pub const CORNER_PAIRS: [(DoorSlot, DoorSlot); 4] = [(0, 7), (1, 2), (3, 4), (5, 6)];

/// Groups of mutually connected door slots.
///
/// Stored canonically (each group sorted, groups sorted), so two partitions with the
/// same grouping compare equal regardless of how they were built.
///
/// # Examples
///
/// ```
/// use cubelike::Partition;
///
/// let p = Partition::new(vec![vec![5, 4], vec![1, 0]]).unwrap();
/// assert_eq!(p.groups(), &[vec![0, 1], vec![4, 5]]);
/// assert!(p.has_door(4));
/// assert!(!p.has_door(2));
/// assert!(p.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<DoorSlot>>", into = "Vec<Vec<DoorSlot>>")]
pub struct Partition {
    groups: Vec<Vec<DoorSlot>>,
    membership: [Option<usize>; DOOR_COUNT],
}

impl Partition {
    /// Builds a partition from a grouping, rejecting empty groups, repeated doors
    /// and slots outside 0..8.
    pub fn new(groups: Vec<Vec<DoorSlot>>) -> CubelikeResult<Self> {
        let mut seen = [false; DOOR_COUNT];
        for group in &groups {
            if group.is_empty() {
                return Err(CubelikeError::InvalidPartition(format!(
                    "empty group in partition: {groups:?}"
                )));
            }
            for &door in group {
                if door >= DOOR_COUNT {
                    return Err(CubelikeError::InvalidPartition(format!(
                        "door {door} out of range: {groups:?}"
                    )));
                }
                if seen[door] {
                    return Err(CubelikeError::InvalidPartition(format!(
                        "door {door} appears multiple times: {groups:?}"
                    )));
                }
                seen[door] = true;
            }
        }
        Ok(Self::from_disjoint_groups(groups))
    }

    /// The partition with every door closed.
    pub fn closed() -> Self {
        Self::from_disjoint_groups(Vec::new())
    }

    /// Canonicalizes groups already known to be disjoint, non-empty and in range.
    pub(crate) fn from_disjoint_groups(mut groups: Vec<Vec<DoorSlot>>) -> Self {
        for group in &mut groups {
            group.sort_unstable();
        }
        groups.sort();

        let mut membership = [None; DOOR_COUNT];
        for (index, group) in groups.iter().enumerate() {
            for &door in group {
                membership[door] = Some(index);
            }
        }

        Self { groups, membership }
    }

    /// Checks if a door slot is open.
    pub fn has_door(&self, door: DoorSlot) -> bool {
        self.group_of(door).is_some()
    }

    /// Gets the index of the group containing `door`, if it is open.
    pub fn group_of(&self, door: DoorSlot) -> Option<usize> {
        self.membership.get(door).copied().flatten()
    }

    /// Checks if two open doors belong to the same group.
    pub fn are_connected(&self, a: DoorSlot, b: DoorSlot) -> bool {
        match (self.group_of(a), self.group_of(b)) {
            (Some(ga), Some(gb)) => ga == gb,
            _ => false,
        }
    }

    /// All open doors in ascending order.
    pub fn doors(&self) -> Vec<DoorSlot> {
        (0..DOOR_COUNT).filter(|&door| self.has_door(door)).collect()
    }

    /// The canonical grouping.
    pub fn groups(&self) -> &[Vec<DoorSlot>] {
        &self.groups
    }

    /// Number of groups.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Checks whether the grouping can be realized inside a single tile.
    ///
    /// Doors sharing a corner share a hub, so they must connect if both are open.
    /// Connections are planar: walking the door ring, the sequence of groups may not
    /// show an A-B-A-C or an A-B-C-B pattern.
    pub fn is_valid(&self) -> bool {
        for (a, b) in CORNER_PAIRS {
            if let (Some(ga), Some(gb)) = (self.group_of(a), self.group_of(b)) {
                if ga != gb {
                    return false;
                }
            }
        }

        let ring = self.ring_sequence();
        !(has_reentry_with_tail(&ring) || has_second_reentry(&ring))
    }

    /// Group ids met walking the ring 0..8, with repeats collapsed and the wrap from
    /// door 7 back to the start merged.
    fn ring_sequence(&self) -> Vec<usize> {
        let mut ring: Vec<usize> = Vec::with_capacity(DOOR_COUNT);
        for door in 0..DOOR_COUNT {
            let Some(group) = self.group_of(door) else {
                continue;
            };
            match ring.last() {
                None => ring.push(group),
                Some(&last) if last != group => {
                    if door != DOOR_COUNT - 1 || ring.first() != Some(&group) {
                        ring.push(group);
                    }
                }
                Some(_) => {}
            }
        }
        ring
    }

    /// Samples a random valid partition satisfying `constraints`.
    ///
    /// Mandatory doors (forced open or forced connected) are always open; a random
    /// number of optional doors is added, the doors are shuffled into a random number
    /// of groups, and the forced-connected doors are merged into one random group.
    /// Candidates are redrawn until one is valid.
    pub fn random(constraints: &PartitionConstraints, rng: &mut StdRng) -> CubelikeResult<Self> {
        constraints.check()?;

        for _ in 0..MAX_PARTITION_ATTEMPTS {
            let candidate = constraints.sample(rng);
            if candidate.is_valid() {
                return Ok(candidate);
            }
        }

        Err(CubelikeError::PartitionSamplingExhausted {
            attempts: MAX_PARTITION_ATTEMPTS,
        })
    }
}

/// A-B-A-C: some group comes back after at least one other group and is followed by
/// yet another entry.
fn has_reentry_with_tail(ring: &[usize]) -> bool {
    (0..ring.len()).any(|i| ((i + 2)..ring.len().saturating_sub(1)).any(|j| ring[j] == ring[i]))
}

/// A-B-C-B: the group after some position comes back at least two entries later.
fn has_second_reentry(ring: &[usize]) -> bool {
    (1..ring.len()).any(|i| ((i + 2)..ring.len()).any(|k| ring[k] == ring[i]))
}

impl Default for Partition {
    fn default() -> Self {
        Self::closed()
    }
}

impl TryFrom<Vec<Vec<DoorSlot>>> for Partition {
    type Error = CubelikeError;

    fn try_from(groups: Vec<Vec<DoorSlot>>) -> Result<Self, Self::Error> {
        Partition::new(groups)
    }
}

impl From<Partition> for Vec<Vec<DoorSlot>> {
    fn from(partition: Partition) -> Self {
        partition.groups
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Partition:{:?}", self.groups)?;
        if !self.is_valid() {
            write!(f, " (invalid)")?;
        }
        Ok(())
    }
}

/// Requirements for [`Partition::random`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionConstraints {
    /// Minimum number of open doors (soft: forced doors may exceed it)
    pub min_doors: usize,
    /// Maximum number of open doors (soft: forced doors may exceed it)
    pub max_doors: usize,
    /// Doors that must be open
    pub force_open: Vec<DoorSlot>,
    /// Doors that must be closed
    pub force_closed: Vec<DoorSlot>,
    /// Doors that must be open and in the same group
    pub force_connected: Vec<DoorSlot>,
}

impl Default for PartitionConstraints {
    fn default() -> Self {
        Self {
            min_doors: 0,
            max_doors: DOOR_COUNT,
            force_open: Vec::new(),
            force_closed: Vec::new(),
            force_connected: Vec::new(),
        }
    }
}

impl PartitionConstraints {
    /// Creates unconstrained requirements (0 to 8 doors).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the door count bounds.
    pub fn with_door_count(mut self, min_doors: usize, max_doors: usize) -> Self {
        self.min_doors = min_doors;
        self.max_doors = max_doors;
        self
    }

    /// Requires `doors` to be open.
    pub fn with_open(mut self, doors: &[DoorSlot]) -> Self {
        self.force_open.extend_from_slice(doors);
        self
    }

    /// Requires `doors` to be closed.
    pub fn with_closed(mut self, doors: &[DoorSlot]) -> Self {
        self.force_closed.extend_from_slice(doors);
        self
    }

    /// Requires `doors` to be open and connected to each other.
    pub fn with_connected(mut self, doors: &[DoorSlot]) -> Self {
        self.force_connected.extend_from_slice(doors);
        self
    }

    fn check(&self) -> CubelikeResult<()> {
        if self.min_doors > self.max_doors {
            return Err(CubelikeError::ConflictingConstraints(format!(
                "min_doors {} > max_doors {}",
                self.min_doors, self.max_doors
            )));
        }
        let all = self
            .force_open
            .iter()
            .chain(&self.force_closed)
            .chain(&self.force_connected);
        if let Some(door) = all.into_iter().find(|&&door| door >= DOOR_COUNT) {
            return Err(CubelikeError::ConflictingConstraints(format!(
                "door {door} out of range"
            )));
        }
        if let Some(door) = self
            .force_closed
            .iter()
            .find(|door| self.force_open.contains(door) || self.force_connected.contains(door))
        {
            return Err(CubelikeError::ConflictingConstraints(format!(
                "door {door} is forced both open and closed"
            )));
        }
        Ok(())
    }

    fn sample(&self, rng: &mut StdRng) -> Partition {
        let connected: Vec<DoorSlot> = (0..DOOR_COUNT)
            .filter(|door| self.force_connected.contains(door))
            .collect();
        let mut doors: Vec<DoorSlot> = (0..DOOR_COUNT)
            .filter(|door| self.force_open.contains(door) && !connected.contains(door))
            .collect();
        let optional: Vec<DoorSlot> = (0..DOOR_COUNT)
            .filter(|door| {
                !doors.contains(door)
                    && !connected.contains(door)
                    && !self.force_closed.contains(door)
            })
            .collect();

        let mandatory = (doors.len() + connected.len()) as i64;
        let low = self.min_doors as i64 - mandatory;
        let high = self.max_doors as i64 - mandatory;
        let to_choose = rng.gen_range(low..=high).clamp(0, optional.len() as i64) as usize;
        doors.extend(optional.choose_multiple(rng, to_choose).copied());

        if doors.is_empty() {
            return if connected.is_empty() {
                Partition::closed()
            } else {
                Partition::from_disjoint_groups(vec![connected])
            };
        }

        doors.shuffle(rng);
        let n_groups = rng.gen_range(1..=doors.len());
        let mut groups: Vec<Vec<DoorSlot>> = doors[..n_groups].iter().map(|&d| vec![d]).collect();
        for &door in &doors[n_groups..] {
            let target = rng.gen_range(0..n_groups);
            groups[target].push(door);
        }

        if !connected.is_empty() {
            let target = rng.gen_range(0..=n_groups);
            if target == n_groups {
                groups.push(connected);
            } else {
                groups[target].extend(connected);
            }
        }

        Partition::from_disjoint_groups(groups)
    }
}
