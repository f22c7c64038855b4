//! Cactus Runner - an endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, obstacle stream, detectors, registry)
//! - `tuning`: Data-driven physics and difficulty balance
//! - `error`: Crate error type
//!
//! Rendering, asset loading, windowing and input polling live outside this crate.
//! The renderer reads [`sim::RenderView`] once per frame.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{Result, SimError};
pub use tuning::{DetectorSpec, Tuning};

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (30 Hz)
    pub const SIM_DT: f32 = 1.0 / 30.0;
    /// Simulation steps per second
    pub const TICK_RATE: u32 = 30;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Height of the running surface
    pub const GROUND_HEIGHT: f32 = 1.0;
    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Jump impulse as a multiple of `GRAVITY * SIM_DT`
    pub const JUMP_MULTIPLIER: f32 = 21.0;
    /// Lateral acceleration per held tick as a multiple of `GRAVITY * SIM_DT`
    pub const STRAFE_MULTIPLIER: f32 = 1.2;
    /// Grounded friction: fraction of velocity removed per second
    pub const GROUND_DAMPING: f32 = 1.0;
    /// Slack above the ground within which a jump is still honored
    pub const JUMP_EPSILON: f32 = 0.01;
    /// Player x is clamped to [-LANE_HALF_WIDTH, LANE_HALF_WIDTH]
    pub const LANE_HALF_WIDTH: f32 = 5.0;

    /// Obstacles that must exist ahead of the player after stream maintenance
    pub const MIN_OBSTACLES_AHEAD: usize = 100;
    /// Spawn band start, measured forward from the player
    pub const SPAWN_NEAR: f32 = 30.0;
    /// Spawn band end (exclusive)
    pub const SPAWN_FAR: f32 = 110.0;

    /// Base scroll speed (units per tick, toward -z)
    pub const BASE_SCROLL_SPEED: f32 = 0.1 * 16.0;
    /// Ticks between difficulty ramps
    pub const RAMP_INTERVAL_TICKS: u64 = 140;
    /// Each ramp adds this fraction of the base scroll vector
    pub const RAMP_FRACTION: f32 = 0.6;
    /// Ticks between the player's fallback to the idle pose
    pub const IDLE_INTERVAL_TICKS: u64 = 20;

    /// Player spawn point
    pub const PLAYER_SPAWN: Vec3 = Vec3::new(0.0, GROUND_HEIGHT, 0.0);

    /// Camera start position
    pub const CAMERA_START: Vec3 = Vec3::new(-3.310_783_1, 5.900_922_3, -7.950_422_3);
    /// Camera rest offset from the player
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.5, 3.0, -3.0);
    /// Camera lerp factor per tick
    pub const CAMERA_FOLLOW_RATE: f32 = 5.0 * 16.0 / 1000.0;
}

/// Clamp an x coordinate to the running lane
#[inline]
pub fn clamp_to_lane(x: f32, half_width: f32) -> f32 {
    x.clamp(-half_width, half_width)
}
