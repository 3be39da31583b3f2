//! Cellular Automata - a falling sand simulation
//!
//! Core modules:
//! - `sim`: Deterministic grid simulation (materials, entropy, update engine, stamping)
//! - `settings`: Data-driven runtime configuration
//!
//! Window management, input polling and presentation belong to the embedding
//! shell. The kernel consumes brush strokes and tick requests and produces a
//! packed-pixel draw buffer.

pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use settings::Settings;
pub use sim::{Material, MaterialTable, Simulation, TickStats};

/// Simulation configuration constants
pub mod consts {
    /// Random words drawn per tick; cells share them through the rng buckets
    pub const RAND_BATCH_SIZE: usize = 4000;

    /// Maximum behavior sets per material
    pub const MAX_BEHAVIOR_SETS: usize = 4;
    /// Maximum directions in one behavior set
    pub const MAX_BEHAVIORS_PER_SET: usize = 8;

    /// Color of an EMPTY cell (opaque black, RGBA)
    pub const EMPTY_COLOR: [u8; 4] = [0, 0, 0, 255];

    /// Default simulation dimensions
    pub const SIMULATION_WIDTH: u32 = 1200;
    pub const SIMULATION_HEIGHT: u32 = 800;

    /// Frame budget in milliseconds (one tick per frame)
    pub const FRAME_BUDGET_MS: u32 = 30;

    /// Brush radius limits
    pub const MIN_DRAW_RADIUS: u16 = 3;
    pub const MAX_DRAW_RADIUS: u16 = 75;
    pub const DEFAULT_DRAW_RADIUS: u16 = 15;

    /// Bounds for the xorshift seed words (never zero)
    pub const XORSHIFT_SEED_MIN: u32 = 100_000_000;
    pub const XORSHIFT_SEED_MAX: u32 = i32::MAX as u32;
}
