//! Physics and difficulty tuning
//!
//! Every constant the simulation was balanced against lives here so it can be
//! loaded from JSON. Defaults reproduce the stock game.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::sim::Aabb;
use crate::sim::DetectorReaction;
use crate::sim::VisualHandle;
use crate::sim::visual::WORLD_VISUAL;

/// Player collision box (local space)
pub const PLAYER_BOUNDS: Aabb =
    Aabb::from_ordered(Vec3::new(0.2, 0.0, 0.1), Vec3::new(0.8, 0.5, 0.8));

/// Despawn slab placed behind the player.
///
/// Spans the whole lane. Obstacles moving less than its 64-unit depth per tick
/// cannot step over it; past that speed (about 65 ramps into one run) they
/// skip it and are never retired unless `max_scroll_speed` caps the ramp.
pub const DESPAWN_BOUNDS: Aabb =
    Aabb::from_ordered(Vec3::new(-10.0, 0.0, -64.0), Vec3::new(10.0, 18.0, 0.5));

/// Where the default despawn detector sits
pub const DESPAWN_POSITION: Vec3 = Vec3::new(0.0, 1.0, -4.0);

/// A detector placed when a world is seeded
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetectorSpec {
    pub position: Vec3,
    pub bounds: Aabb,
    #[serde(default)]
    pub reaction: DetectorReaction,
}

impl Default for DetectorSpec {
    fn default() -> Self {
        Self {
            position: DESPAWN_POSITION,
            bounds: DESPAWN_BOUNDS,
            reaction: DetectorReaction::Despawn,
        }
    }
}

/// A static world-layer object placed when a world is seeded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenerySpec {
    pub position: Vec3,
    pub visual: VisualHandle,
    pub state_key: String,
}

impl Default for ScenerySpec {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            visual: VisualHandle::new(WORLD_VISUAL),
            state_key: "0".to_owned(),
        }
    }
}

/// Simulation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics ===
    /// Downward acceleration while airborne (units/s²)
    pub gravity: f32,
    /// Jump impulse = gravity * dt * jump_multiplier
    pub jump_multiplier: f32,
    /// Lateral acceleration per held tick = gravity * dt * strafe_multiplier
    pub strafe_multiplier: f32,
    /// Fraction of velocity shed per second while grounded
    pub damping: f32,
    pub ground_height: f32,
    /// Jumps are honored up to this far above the ground
    pub jump_epsilon: f32,
    pub lane_half_width: f32,
    pub player_spawn: Vec3,
    pub player_bounds: Aabb,

    // === Obstacle stream ===
    pub min_obstacles_ahead: usize,
    /// Spawn band [near, far) measured forward from the player
    pub spawn_near: f32,
    pub spawn_far: f32,
    /// Units per tick
    pub base_scroll_speed: f32,
    pub ramp_interval_ticks: u64,
    /// Each ramp adds this fraction of the base scroll vector
    pub ramp_fraction: f32,
    /// Ramps stop at this speed (units per tick). Unset means no cap.
    pub max_scroll_speed: Option<f32>,

    // === World ===
    pub detectors: Vec<DetectorSpec>,
    pub scenery: Vec<ScenerySpec>,
    pub idle_interval_ticks: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_multiplier: JUMP_MULTIPLIER,
            strafe_multiplier: STRAFE_MULTIPLIER,
            damping: GROUND_DAMPING,
            ground_height: GROUND_HEIGHT,
            jump_epsilon: JUMP_EPSILON,
            lane_half_width: LANE_HALF_WIDTH,
            player_spawn: PLAYER_SPAWN,
            player_bounds: PLAYER_BOUNDS,

            min_obstacles_ahead: MIN_OBSTACLES_AHEAD,
            spawn_near: SPAWN_NEAR,
            spawn_far: SPAWN_FAR,
            base_scroll_speed: BASE_SCROLL_SPEED,
            ramp_interval_ticks: RAMP_INTERVAL_TICKS,
            ramp_fraction: RAMP_FRACTION,
            max_scroll_speed: None,

            detectors: vec![DetectorSpec::default()],
            scenery: vec![ScenerySpec::default()],
            idle_interval_ticks: IDLE_INTERVAL_TICKS,
        }
    }
}

impl Tuning {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(SimError::InvalidTuning(msg.to_owned()))
            }
        }

        let finite = [
            ("gravity", self.gravity),
            ("lane_half_width", self.lane_half_width),
            ("spawn_near", self.spawn_near),
            ("spawn_far", self.spawn_far),
            ("base_scroll_speed", self.base_scroll_speed),
            ("ramp_fraction", self.ramp_fraction),
        ];
        for (name, value) in finite {
            check(value.is_finite(), &format!("{name} must be finite"))?;
        }

        check(self.gravity > 0.0, "gravity must be positive")?;
        check(self.jump_multiplier >= 0.0, "jump_multiplier must not be negative")?;
        check(self.strafe_multiplier >= 0.0, "strafe_multiplier must not be negative")?;
        check(
            self.damping >= 0.0 && self.damping * SIM_DT < 1.0,
            "damping must be in [0, 1/SIM_DT)",
        )?;
        check(self.jump_epsilon >= 0.0, "jump_epsilon must not be negative")?;
        check(self.lane_half_width > 0.0, "lane_half_width must be positive")?;
        check(self.spawn_near > 0.0, "spawn_near must be ahead of the player")?;
        check(
            self.spawn_near < self.spawn_far,
            "spawn_near must be below spawn_far",
        )?;
        check(self.base_scroll_speed > 0.0, "base_scroll_speed must be positive")?;
        check(self.ramp_interval_ticks > 0, "ramp_interval_ticks must be positive")?;
        check(self.ramp_fraction > 0.0, "ramp_fraction must be positive")?;
        if let Some(cap) = self.max_scroll_speed {
            check(
                cap.is_finite() && cap >= self.base_scroll_speed,
                "max_scroll_speed must be finite and at least base_scroll_speed",
            )?;
        }
        check(self.idle_interval_ticks > 0, "idle_interval_ticks must be positive")?;
        check(
            self.player_spawn.y >= self.ground_height,
            "player_spawn must not be below the ground",
        )?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Forward speed gained per ramp step
    pub fn ramp_step(&self) -> f32 {
        self.base_scroll_speed * self.ramp_fraction
    }
}
