//! Error types for simulation construction

use thiserror::Error;

/// Malformed or incomplete material rule data
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("failed to read material rules: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse material rules: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown material `{0}`")]
    UnknownMaterial(String),

    #[error("material `{0}` is defined more than once")]
    DuplicateMaterial(String),

    #[error("no rules given for material `{0}`")]
    MissingMaterial(&'static str),

    #[error("material `{material}` has invalid direction index {value}")]
    InvalidDirection { material: &'static str, value: u8 },

    #[error("material `{material}` has {count} behavior sets (max {max})")]
    TooManyBehaviorSets {
        material: &'static str,
        count: usize,
        max: usize,
    },

    #[error("material `{material}` behavior set {set} is empty")]
    EmptyBehaviorSet { material: &'static str, set: usize },

    #[error("material `{material}` behavior set {set} has {count} directions (max {max})")]
    TooManyDirections {
        material: &'static str,
        set: usize,
        count: usize,
        max: usize,
    },

    #[error("material `{material}` minSpeed {min} exceeds maxSpeed {max}")]
    SpeedRange {
        material: &'static str,
        min: u8,
        max: u8,
    },
}

/// Fatal errors while constructing a simulation
#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Rules(#[from] RuleError),
}
