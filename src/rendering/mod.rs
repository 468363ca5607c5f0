//! # Rendering Module
//!
//! Text dumps of cell grids for debugging and the command line.

pub mod display;

pub use display::*;
