//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here.

use glam::{Mat4, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::{Collidable, ColliderKind};
use super::detector::DetectorReaction;
use super::player::Player;
use super::registry::Registry;
use super::stream;
use super::visual::{CACTUS_VISUAL, DETECTOR_VISUAL, VisualCatalog, VisualHandle};
use crate::consts::CAMERA_START;
use crate::error::Result;
use crate::tuning::Tuning;

/// Registry-assigned identity. Entities are never compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Obstacle types with their spawn defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleType {
    #[default]
    C0,
}

impl ObstacleType {
    /// Local collision box used when the variant has no bounds of its own
    pub fn default_bounds(self) -> Aabb {
        match self {
            ObstacleType::C0 => Aabb::UNIT,
        }
    }

    pub fn default_state_key(self) -> &'static str {
        match self {
            ObstacleType::C0 => "0",
        }
    }

    pub fn visual(self) -> VisualHandle {
        match self {
            ObstacleType::C0 => VisualHandle::new(CACTUS_VISUAL),
        }
    }
}

/// What a registry entity is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle { ty: ObstacleType },
    /// Stationary trigger volume
    Detector { reaction: DetectorReaction },
}

/// A registry entity (obstacle or detector)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// World position
    pub pos: Vec3,
    /// Displacement per tick
    pub vel: Vec3,
    pub visual: VisualHandle,
    /// Named variant of `visual` to display
    pub state_key: String,
    /// Local-space collision box
    pub bounds: Aabb,
    pub kind: EntityKind,
}

impl Entity {
    pub fn obstacle(id: EntityId, ty: ObstacleType, pos: Vec3, vel: Vec3) -> Self {
        Self {
            id,
            pos,
            vel,
            visual: ty.visual(),
            state_key: ty.default_state_key().to_owned(),
            bounds: ty.default_bounds(),
            kind: EntityKind::Obstacle { ty },
        }
    }

    pub fn detector(id: EntityId, pos: Vec3, bounds: Aabb, reaction: DetectorReaction) -> Self {
        Self {
            id,
            pos,
            vel: Vec3::ZERO,
            visual: VisualHandle::new(DETECTOR_VISUAL),
            state_key: "box".to_owned(),
            bounds,
            kind: EntityKind::Detector { reaction },
        }
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self.kind, EntityKind::Obstacle { .. })
    }

    /// Generic per-tick step: `pos += vel`. Detectors never move.
    #[inline]
    pub fn integrate(&mut self) {
        if let EntityKind::Detector { .. } = self.kind {
            return;
        }
        self.pos += self.vel;
    }
}

/// Static scenery on the world layer (drawn, never collided)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenery {
    pub pos: Vec3,
    pub visual: VisualHandle,
    pub state_key: String,
}

/// Observable state transitions, drained by the caller each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh world was seeded (also emitted for the first world)
    WorldGenerated { generation: u64 },
    /// The player touched an obstacle; the world has already been reset
    RunEnded {
        generation: u64,
        ticks_survived: u64,
        scroll_speed: f32,
        obstacle: EntityId,
    },
    /// Difficulty ramp applied
    RampStep { generation: u64, scroll_speed: f32 },
    Jumped,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub catalog: VisualCatalog,
    /// Ticks since the state was created
    pub time_ticks: u64,
    /// Ticks since the current world was seeded
    pub run_ticks: u64,
    /// Incremented on every world reset
    pub generation: u64,
    /// Shared obstacle velocity
    pub scroll: Vec3,
    pub player: Player,
    /// Object layer
    pub registry: Registry,
    /// Static scenery, cleared on reset
    pub world_layer: Vec<Scenery>,
    /// Follow camera position
    pub camera: Vec3,
    #[serde(skip)]
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game state with stock tuning and catalog
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default(), VisualCatalog::with_defaults())
    }

    /// Create a game state with custom tuning, rejecting invalid values
    pub fn with_config(seed: u64, tuning: Tuning, catalog: VisualCatalog) -> Result<Self> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning, catalog))
    }

    fn build(seed: u64, tuning: Tuning, catalog: VisualCatalog) -> Self {
        let player = Player::new(&tuning, &catalog);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            scroll: stream::base_scroll(&tuning),
            tuning,
            catalog,
            time_ticks: 0,
            run_ticks: 0,
            generation: 0,
            player,
            registry: Registry::new(),
            world_layer: Vec::new(),
            camera: CAMERA_START,
            events: Vec::new(),
        };
        state.seed_world();
        state
    }

    /// Place the initial detectors and scenery, and reset the scroll vector
    fn seed_world(&mut self) {
        self.scroll = stream::base_scroll(&self.tuning);
        for &placed in &self.tuning.detectors {
            self.registry
                .spawn(|id| Entity::detector(id, placed.position, placed.bounds, placed.reaction));
        }
        let scenery = self.tuning.scenery.clone();
        for placed in scenery {
            self.add_scenery(placed.position, placed.visual, &placed.state_key);
        }
        log::info!(
            "World {} generated ({} detectors, {} scenery)",
            self.generation,
            self.tuning.detectors.len(),
            self.world_layer.len()
        );
        self.events.push(GameEvent::WorldGenerated {
            generation: self.generation,
        });
    }

    /// Drop every entity and start a new world.
    ///
    /// Also respawns the player at rest, which the original world regeneration did not do.
    pub fn reset_world(&mut self) {
        self.registry.clear();
        self.world_layer.clear();
        self.generation += 1;
        self.run_ticks = 0;
        self.player.respawn(&self.tuning, &self.catalog);
        self.seed_world();
    }

    /// Terminal collision: report the run and reset
    pub(crate) fn end_run(&mut self, obstacle: EntityId) {
        let ticks_survived = self.run_ticks;
        let scroll_speed = self.scroll_speed();
        log::info!(
            "Game over! world {} survived {} ticks at speed {:.2}",
            self.generation,
            ticks_survived,
            scroll_speed
        );
        self.events.push(GameEvent::RunEnded {
            generation: self.generation,
            ticks_survived,
            scroll_speed,
            obstacle,
        });
        self.reset_world();
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Magnitude of the scroll vector
    pub fn scroll_speed(&self) -> f32 {
        self.scroll.length()
    }

    pub fn obstacles_ahead(&self) -> usize {
        self.registry.count_obstacles_ahead(self.player.pos.z)
    }

    /// Add a static world-layer object
    pub fn add_scenery(&mut self, pos: Vec3, visual: VisualHandle, state_key: &str) {
        let state_key = self.catalog.resolve_key(&visual, state_key);
        self.world_layer.push(Scenery {
            pos,
            visual,
            state_key,
        });
    }

    /// Read-only view for the renderer
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            generation: self.generation,
            camera: self.camera,
            player: PlayerView {
                position: self.player.pos,
                transform: self.player.transform,
                visual: &self.player.visual,
                state_key: &self.player.state_key,
            },
            entities: self
                .registry
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.collider_kind(),
                    position: e.pos,
                    visual: &e.visual,
                    state_key: &e.state_key,
                })
                .collect(),
            scenery: &self.world_layer,
        }
    }

    /// Debug dump of the full state
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    /// Changes whenever the world resets; flush per-entity caches on change
    pub generation: u64,
    pub camera: Vec3,
    pub player: PlayerView<'a>,
    pub entities: Vec<EntityView<'a>>,
    pub scenery: &'a [Scenery],
}

#[derive(Debug, Clone)]
pub struct PlayerView<'a> {
    pub position: Vec3,
    pub transform: Mat4,
    pub visual: &'a VisualHandle,
    pub state_key: &'a str,
}

#[derive(Debug, Clone)]
pub struct EntityView<'a> {
    pub id: EntityId,
    pub kind: ColliderKind,
    pub position: Vec3,
    pub visual: &'a VisualHandle,
    pub state_key: &'a str,
}
