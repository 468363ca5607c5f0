//! # Generation Mathematics
//!
//! Small combinatorial helpers.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Every on/off assignment of `zones` toggles, as bit masks, in random order but
/// with fewer set bits first.
///
/// Callers cap `zones`; the result has `2^zones` entries.
pub fn toggle_combinations(zones: usize, rng: &mut StdRng) -> Vec<u32> {
    let mut masks: Vec<u32> = (0..(1u32 << zones)).collect();
    masks.shuffle(rng);
    masks.sort_by_key(|mask| mask.count_ones());
    masks
}

/// Checks whether bit `index` of `mask` is set.
pub fn bit_is_set(mask: u32, index: usize) -> bool {
    mask & (1 << index) != 0
}
