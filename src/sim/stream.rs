//! Obstacle stream
//!
//! Keeps a bounded window of obstacles ahead of the player instead of
//! generating the course upfront, and ramps the shared scroll vector on a
//! fixed cadence. The stream only ever adds obstacles; detectors retire them.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::registry::Registry;
use super::state::{Entity, EntityId, ObstacleType};
use super::visual::VisualCatalog;
use crate::tuning::Tuning;

/// Starting scroll vector: obstacles travel toward -z
pub fn base_scroll(tuning: &Tuning) -> Vec3 {
    Vec3::new(0.0, 0.0, -tuning.base_scroll_speed)
}

/// Top the window back up to `min_obstacles_ahead`.
///
/// Returns how many obstacles were spawned.
pub fn maintain(
    registry: &mut Registry,
    player_pos: Vec3,
    scroll: Vec3,
    catalog: &VisualCatalog,
    tuning: &Tuning,
    rng: &mut Pcg32,
) -> usize {
    let ahead = registry.count_obstacles_ahead(player_pos.z);
    if ahead >= tuning.min_obstacles_ahead {
        return 0;
    }

    let need = tuning.min_obstacles_ahead - ahead;
    for _ in 0..need {
        spawn_obstacle(registry, ObstacleType::C0, player_pos, scroll, catalog, tuning, rng);
    }
    log::debug!("stream: {} ahead, spawned {}", ahead, need);
    need
}

/// One obstacle somewhere in the lookahead band with a random variant
pub fn spawn_obstacle(
    registry: &mut Registry,
    ty: ObstacleType,
    player_pos: Vec3,
    scroll: Vec3,
    catalog: &VisualCatalog,
    tuning: &Tuning,
    rng: &mut Pcg32,
) -> EntityId {
    let half = tuning.lane_half_width;
    let x = rng.random_range(-half..half);
    let z = player_pos.z + rng.random_range(tuning.spawn_near..tuning.spawn_far);
    let pos = Vec3::new(x, tuning.ground_height, z);

    let visual = ty.visual();
    let state_key = catalog
        .random_key(&visual, rng)
        .unwrap_or(ty.default_state_key())
        .to_owned();
    let bounds = catalog
        .bounds_for(&visual, &state_key)
        .unwrap_or_else(|| ty.default_bounds());

    registry.spawn(|id| {
        let mut cactus = Entity::obstacle(id, ty, pos, scroll);
        cactus.visual = visual;
        cactus.state_key = state_key;
        cactus.bounds = bounds;
        cactus
    })
}

/// Grow the scroll vector by one ramp step and hand it to every live obstacle.
///
/// Speed never exceeds `max_scroll_speed` when one is set.
pub fn ramp(scroll: &mut Vec3, registry: &mut Registry, tuning: &Tuning) {
    let mut speed = scroll.length() + tuning.ramp_step();
    if let Some(cap) = tuning.max_scroll_speed {
        speed = speed.min(cap);
    }
    *scroll = Vec3::NEG_Z * speed;
    for obstacle in registry.obstacles_mut() {
        obstacle.vel = *scroll;
    }
    log::info!("Speed up: scroll speed now {:.2}", scroll.length());
}
