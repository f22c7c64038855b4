//! Player controller
//!
//! Grounded and airborne are not stored; they are read off `pos.y` against
//! the ground height every tick. The player lives beside the registry rather
//! than in it, and checks itself against every obstacle before moving.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::{Collidable, ColliderKind, first_obstacle_hit};
use super::registry::Registry;
use super::state::EntityId;
use super::tick::TickInput;
use super::visual::{PLAYER_IDLE, PLAYER_MOVE, PLAYER_VISUAL, VisualCatalog, VisualHandle};
use crate::clamp_to_lane;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec3,
    /// Units per second (integrated with `dt`, unlike registry entities)
    pub vel: Vec3,
    pub bounds: Aabb,
    /// Model transform handed to the renderer
    pub transform: Mat4,
    pub visual: VisualHandle,
    pub state_key: String,
}

impl Player {
    pub fn new(tuning: &Tuning, catalog: &VisualCatalog) -> Self {
        let visual = VisualHandle::new(PLAYER_VISUAL);
        Self {
            pos: tuning.player_spawn,
            vel: Vec3::ZERO,
            bounds: tuning.player_bounds,
            transform: Mat4::from_translation(tuning.player_spawn),
            state_key: catalog.resolve_key(&visual, PLAYER_IDLE),
            visual,
        }
    }

    /// Back to the spawn point, at rest, idle
    pub fn respawn(&mut self, tuning: &Tuning, catalog: &VisualCatalog) {
        *self = Self::new(tuning, catalog);
    }

    #[inline]
    pub fn is_grounded(&self, tuning: &Tuning) -> bool {
        self.pos.y <= tuning.ground_height
    }

    #[inline]
    pub fn can_jump(&self, tuning: &Tuning) -> bool {
        self.pos.y <= tuning.ground_height + tuning.jump_epsilon
    }

    /// Upward impulse if on the ground. Returns whether the jump happened.
    pub fn jump(&mut self, tuning: &Tuning, dt: f32) -> bool {
        if !self.can_jump(tuning) {
            return false;
        }
        self.vel.y += tuning.gravity * dt * tuning.jump_multiplier;
        log::info!("Jump.");
        true
    }

    /// Apply one tick of input. Left wins when both sides are held.
    ///
    /// Returns whether a jump was performed.
    pub fn apply_input(
        &mut self,
        input: &TickInput,
        tuning: &Tuning,
        catalog: &VisualCatalog,
        dt: f32,
    ) -> bool {
        let jumped = input.jump && self.jump(tuning, dt);

        let strafe = tuning.gravity * dt * tuning.strafe_multiplier;
        if input.move_left {
            self.vel.x += strafe;
        } else if input.move_right {
            self.vel.x -= strafe;
        }
        if input.is_strafing() {
            self.set_state_key(catalog, PLAYER_MOVE);
        }
        jumped
    }

    /// First obstacle the player currently overlaps
    pub fn first_hit(&self, registry: &Registry) -> Option<EntityId> {
        first_obstacle_hit(registry, self)
    }

    /// Gravity or ground friction, then position, then ground and lane clamps
    pub fn integrate(&mut self, tuning: &Tuning, dt: f32) {
        if self.is_grounded(tuning) {
            self.vel -= self.vel * (tuning.damping * dt);
        } else {
            self.vel.y -= tuning.gravity * dt;
        }

        self.pos += self.vel * dt;

        if self.pos.y <= tuning.ground_height {
            self.pos.y = tuning.ground_height;
            self.vel.y = 0.0;
        }
        self.pos.x = clamp_to_lane(self.pos.x, tuning.lane_half_width);
        self.transform = Mat4::from_translation(self.pos);
    }

    pub fn set_state_key(&mut self, catalog: &VisualCatalog, key: &str) {
        if self.state_key != key {
            self.state_key = catalog.resolve_key(&self.visual, key);
        }
    }
}

impl Collidable for Player {
    fn collider_kind(&self) -> ColliderKind {
        ColliderKind::Player
    }

    fn position(&self) -> Vec3 {
        self.pos
    }

    fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{Entity, ObstacleType};
    use proptest::prelude::*;

    fn setup() -> (Player, Tuning, VisualCatalog) {
        let tuning = Tuning::default();
        let catalog = VisualCatalog::with_defaults();
        (Player::new(&tuning, &catalog), tuning, catalog)
    }

    fn step(player: &mut Player, input: &TickInput, tuning: &Tuning, catalog: &VisualCatalog) {
        player.apply_input(input, tuning, catalog, SIM_DT);
        player.integrate(tuning, SIM_DT);
    }

    #[test]
    fn test_spawns_grounded_and_idle() {
        let (player, tuning, _) = setup();
        assert!(player.is_grounded(&tuning));
        assert_eq!(player.pos, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(player.state_key, PLAYER_IDLE);
        assert_eq!(player.transform.w_axis.truncate(), player.pos);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let (mut player, tuning, catalog) = setup();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };

        step(&mut player, &jump, &tuning, &catalog);
        assert!(player.pos.y > tuning.ground_height);
        assert!(player.vel.y > 0.0);

        // Mid-air jump is ignored
        let vy = player.vel.y;
        assert!(!player.jump(&tuning, SIM_DT));
        assert_eq!(player.vel.y, vy);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let (mut player, tuning, catalog) = setup();
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        step(&mut player, &jump, &tuning, &catalog);

        let mut peak: f32 = 0.0;
        for _ in 0..120 {
            step(&mut player, &TickInput::default(), &tuning, &catalog);
            peak = peak.max(player.pos.y);
        }
        assert!(peak > 2.0, "jump should clear an obstacle top, peak {peak}");
        assert_eq!(player.pos.y, tuning.ground_height);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_strafe_and_friction() {
        let (mut player, tuning, catalog) = setup();
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        for _ in 0..5 {
            step(&mut player, &left, &tuning, &catalog);
        }
        assert!(player.pos.x > 0.0);
        assert_eq!(player.state_key, PLAYER_MOVE);

        let vx = player.vel.x;
        step(&mut player, &TickInput::default(), &tuning, &catalog);
        assert!(player.vel.x < vx, "grounded damping slows the player");
    }

    #[test]
    fn test_left_wins_over_right() {
        let (mut player, tuning, catalog) = setup();
        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        player.apply_input(&both, &tuning, &catalog, SIM_DT);
        assert!(player.vel.x > 0.0);
    }

    #[test]
    fn test_first_hit_detects_obstacle() {
        let (player, _, _) = setup();
        let mut reg = Registry::new();
        assert!(player.first_hit(&reg).is_none());

        reg.spawn(|id| Entity::obstacle(id, ObstacleType::C0, Vec3::new(3.0, 1.0, 0.0), Vec3::ZERO));
        assert!(player.first_hit(&reg).is_none());

        let hit = reg.spawn(|id| Entity::obstacle(id, ObstacleType::C0, Vec3::new(0.0, 1.0, 0.5), Vec3::ZERO));
        assert_eq!(player.first_hit(&reg), Some(hit));
    }

    fn input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(move_left, move_right, jump)| TickInput {
            move_left,
            move_right,
            jump,
            idle_mode: false,
        })
    }

    proptest! {
        #[test]
        fn prop_ground_and_lane_clamps_hold(inputs in proptest::collection::vec(input(), 1..300)) {
            let (mut player, tuning, catalog) = setup();
            for input in &inputs {
                step(&mut player, input, &tuning, &catalog);
                prop_assert!(player.pos.y >= tuning.ground_height);
                if player.pos.y == tuning.ground_height {
                    prop_assert_eq!(player.vel.y, 0.0);
                }
                prop_assert!(player.pos.x >= -tuning.lane_half_width);
                prop_assert!(player.pos.x <= tuning.lane_half_width);
            }
        }
    }
}
