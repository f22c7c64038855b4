//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod aabb;
pub mod collision;
pub mod detector;
pub mod player;
pub mod registry;
pub mod state;
pub mod stream;
pub mod tick;
pub mod visual;

pub use aabb::Aabb;
pub use collision::{Collidable, ColliderKind, overlaps, transform_aabb};
pub use detector::{DetectorReaction, DetectorReport};
pub use player::Player;
pub use registry::Registry;
pub use state::{
    Entity, EntityId, EntityKind, EntityView, GameEvent, GameState, ObstacleType, PlayerView,
    RenderView, Scenery,
};
pub use tick::{TickInput, tick};
pub use visual::{VisualCatalog, VisualHandle};
