//! Deterministic simulation module
//!
//! The whole kernel lives here. This module must stay pure and deterministic:
//! - One seed drives every random choice
//! - Cells are visited in a fixed shuffled order
//! - No rendering, windowing or input dependencies

pub mod bitset;
pub mod color;
pub mod entropy;
pub mod error;
pub mod grid;
pub mod material;
pub mod rules;
pub mod stamp;
pub mod state;
pub mod tick;

pub use bitset::DirtySet;
pub use color::{Palette, PixelFormat, hsv_to_rgb};
pub use entropy::{
    CellRandom, DigitExtractor, Entropy, EntropyMode, Noise, RandomStream, Xorshift128,
};
pub use error::{RuleError, SimError};
pub use grid::Grid;
pub use material::{Direction, HsvColor, Material, MaterialSpec};
pub use rules::{BUILTIN_RULES, MaterialTable};
pub use stamp::{raster_line, stamp_cell, stamp_circle, stamp_line};
pub use state::Simulation;
pub use tick::{TickStats, tick};
