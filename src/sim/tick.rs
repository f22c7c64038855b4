//! Fixed timestep simulation tick
//!
//! Phase order within a tick: player resolution (which may end the run and
//! reset the world), stream maintenance, camera, generic integration,
//! detector scans, ramp check.

use super::collision::Collidable;
use super::detector::{self, ReactionContext};
use super::state::{GameEvent, GameState};
use super::stream;
use super::visual::PLAYER_IDLE;
use crate::consts::*;

/// How far ahead (world units) the autopilot looks for threats
const AUTOPILOT_LOOKAHEAD: f32 = 12.0;
/// Lateral slack around the player box when picking a threat
const AUTOPILOT_MARGIN: f32 = 0.3;
/// Jump when the threat is this many ticks away at the current scroll speed
const AUTOPILOT_JUMP_TICKS: f32 = 4.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: strafe toward +x. Wins over `move_right` when both are held.
    pub move_left: bool,
    /// Held: strafe toward -x
    pub move_right: bool,
    /// Newly pressed this tick
    pub jump: bool,
    /// Idle/demo mode - the autopilot drives the player
    pub idle_mode: bool,
}

impl TickInput {
    #[inline]
    pub fn is_strafing(&self) -> bool {
        self.move_left || self.move_right
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.run_ticks += 1;

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    // --- PLAYER ---
    // Checked against last tick's positions, before moving
    if let Some(obstacle) = state.player.first_hit(&state.registry) {
        state.end_run(obstacle);
        return;
    }

    if state.player.apply_input(input, &state.tuning, &state.catalog, dt) {
        state.push_event(GameEvent::Jumped);
    }
    state.player.integrate(&state.tuning, dt);

    if !input.is_strafing() && state.run_ticks % state.tuning.idle_interval_ticks == 0 {
        state.player.set_state_key(&state.catalog, PLAYER_IDLE);
    }

    // --- STREAM ---
    stream::maintain(
        &mut state.registry,
        state.player.pos,
        state.scroll,
        &state.catalog,
        &state.tuning,
        &mut state.rng,
    );

    // --- CAMERA ---
    let target = state.player.pos + CAMERA_OFFSET;
    state.camera = state.camera.lerp(target, CAMERA_FOLLOW_RATE);

    // --- INTEGRATION ---
    // Includes obstacles spawned this tick
    for entity in state.registry.iter_mut() {
        entity.integrate();
    }

    // --- DETECTORS ---
    let mut ctx = ReactionContext {
        catalog: &state.catalog,
        tuning: &state.tuning,
        rng: &mut state.rng,
    };
    detector::run_detectors(&mut state.registry, &mut ctx);

    // --- RAMP ---
    if state.run_ticks % state.tuning.ramp_interval_ticks == 0 {
        stream::ramp(&mut state.scroll, &mut state.registry, &state.tuning);
        let event = GameEvent::RampStep {
            generation: state.generation,
            scroll_speed: state.scroll_speed(),
        };
        state.push_event(event);
    }
}

/// Demo driver: sidestep the nearest obstacle in the player's path and jump
/// when it gets close
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = state.player.world_bounds();
    let threat = state
        .registry
        .obstacles()
        .map(|o| o.world_bounds())
        .filter(|b| {
            b.max().z >= player.min().z
                && b.min().z - player.max().z < AUTOPILOT_LOOKAHEAD
                && b.max().x > player.min().x - AUTOPILOT_MARGIN
                && b.min().x < player.max().x + AUTOPILOT_MARGIN
        })
        .min_by(|a, b| a.min().z.total_cmp(&b.min().z));

    let Some(threat) = threat else {
        return;
    };

    let gap = threat.min().z - player.max().z;
    if gap <= state.scroll_speed() * AUTOPILOT_JUMP_TICKS {
        input.jump = true;
    }

    // Dodge away from the threat's center unless the lane edge is in the way
    let half = state.tuning.lane_half_width;
    let toward_plus_x = player.center().x >= threat.center().x;
    let blocked = if toward_plus_x {
        state.player.pos.x >= half - AUTOPILOT_MARGIN
    } else {
        state.player.pos.x <= -half + AUTOPILOT_MARGIN
    };
    if toward_plus_x != blocked {
        input.move_left = true;
    } else {
        input.move_right = true;
    }
}
