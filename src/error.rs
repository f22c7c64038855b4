//! Simulation error type

use thiserror::Error;

/// Errors surfaced by the simulation core.
///
/// Gameplay outcomes (a player hitting an obstacle) are not errors; they are
/// reported through [`crate::sim::GameEvent`].
#[derive(Debug, Error)]
pub enum SimError {
    /// A box was built with `min > max` on some axis
    #[error("invalid AABB: min {min} > max {max} on {axis} axis")]
    InvalidAabb { axis: char, min: f32, max: f32 },

    /// Tuning values that the simulation cannot run with
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Bad command-line argument to the driver
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
