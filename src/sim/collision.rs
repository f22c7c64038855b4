//! Collision capability and overlap queries
//!
//! Everything that collides exposes a local box and a world position. World
//! boxes are always produced by [`transform_aabb`] so the player and the
//! detectors see exactly the same geometry.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::registry::Registry;
use super::state::{Entity, EntityId, EntityKind};

/// The closed set of collidable variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderKind {
    Player,
    Obstacle,
    Detector,
}

/// Something with a local-space box and a world position
pub trait Collidable {
    fn collider_kind(&self) -> ColliderKind;

    fn position(&self) -> Vec3;

    /// Local-space box
    fn bounds(&self) -> &Aabb;

    fn world_bounds(&self) -> Aabb {
        transform_aabb(self.bounds(), self.position())
    }
}

impl Collidable for Entity {
    fn collider_kind(&self) -> ColliderKind {
        match self.kind {
            EntityKind::Obstacle { .. } => ColliderKind::Obstacle,
            EntityKind::Detector { .. } => ColliderKind::Detector,
        }
    }

    fn position(&self) -> Vec3 {
        self.pos
    }

    fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

/// Translate a local box into world space (no rotation or scale)
#[inline]
pub fn transform_aabb(aabb: &Aabb, position: Vec3) -> Aabb {
    aabb.translated(position)
}

/// World-space overlap between two collidables
#[inline]
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Collidable + ?Sized,
    B: Collidable + ?Sized,
{
    a.world_bounds().intersects(&b.world_bounds())
}

/// Ids of registry entities whose world box overlaps `query`'s, in id order.
///
/// `query` itself is skipped when it lives in the registry. The result is a
/// detached list, so callers may mutate the registry while walking it.
pub fn overlapping_ids<P, F>(
    registry: &Registry,
    query: &P,
    skip: Option<EntityId>,
    filter: F,
) -> Vec<EntityId>
where
    P: Collidable + ?Sized,
    F: Fn(&Entity) -> bool,
{
    registry
        .iter()
        .filter(|e| Some(e.id) != skip && filter(e))
        .filter(|e| overlaps(*e, query))
        .map(|e| e.id)
        .collect()
}

/// First obstacle (lowest id) overlapping `query`
pub fn first_obstacle_hit<P>(registry: &Registry, query: &P) -> Option<EntityId>
where
    P: Collidable + ?Sized,
{
    registry
        .obstacles()
        .find(|o| overlaps(*o, query))
        .map(|o| o.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::detector::DetectorReaction;
    use crate::sim::state::ObstacleType;

    fn cactus(reg: &mut Registry, pos: Vec3) -> EntityId {
        reg.spawn(|id| Entity::obstacle(id, ObstacleType::C0, pos, Vec3::ZERO))
    }

    #[test]
    fn test_transform_aabb_translates_both_corners() {
        let local = Aabb::new(Vec3::new(0.2, 0.0, 0.1), Vec3::new(0.8, 0.5, 0.8)).unwrap();
        let world = transform_aabb(&local, Vec3::new(1.0, 1.0, -2.0));
        assert!(world.min().abs_diff_eq(Vec3::new(1.2, 1.0, -1.9), 1e-6));
        assert!(world.max().abs_diff_eq(Vec3::new(1.8, 1.5, -1.2), 1e-6));
        assert!(world.size().abs_diff_eq(local.size(), 1e-6));
    }

    #[test]
    fn test_overlaps_uses_positions() {
        let a = Entity::obstacle(EntityId(1), ObstacleType::C0, Vec3::ZERO, Vec3::ZERO);
        let mut b = Entity::obstacle(EntityId(2), ObstacleType::C0, Vec3::new(0.5, 0.0, 0.0), Vec3::ZERO);
        assert!(overlaps(&a, &b));
        b.pos.x = 2.0;
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_overlapping_ids_skips_query_and_filters() {
        let mut reg = Registry::new();
        let det = reg.spawn(|id| {
            Entity::detector(
                id,
                Vec3::ZERO,
                Aabb::new(Vec3::splat(-2.0), Vec3::splat(2.0)).unwrap(),
                DetectorReaction::Despawn,
            )
        });
        let near = cactus(&mut reg, Vec3::new(1.0, 0.0, 0.0));
        let _far = cactus(&mut reg, Vec3::new(10.0, 0.0, 0.0));

        let query = reg.get(det).unwrap().clone();
        let hits = overlapping_ids(&reg, &query, Some(det), |_| true);
        assert_eq!(hits, vec![near]);

        let none = overlapping_ids(&reg, &query, Some(det), |e| !e.is_obstacle());
        assert!(none.is_empty());
    }

    #[test]
    fn test_first_obstacle_hit_ignores_detectors() {
        let mut reg = Registry::new();
        reg.spawn(|id| Entity::detector(id, Vec3::ZERO, Aabb::UNIT, DetectorReaction::NoOp));
        let query = Entity::obstacle(EntityId(99), ObstacleType::C0, Vec3::ZERO, Vec3::ZERO);
        assert!(first_obstacle_hit(&reg, &query).is_none());

        let hit = cactus(&mut reg, Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(first_obstacle_hit(&reg, &query), Some(hit));
    }
}
