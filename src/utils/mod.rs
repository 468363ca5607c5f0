//! # Utilities Module
//!
//! Flood fills, reachability checks and combinatorics shared by the generators.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
