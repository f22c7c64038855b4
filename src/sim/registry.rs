//! Object layer: the live set of simulation entities
//!
//! Entities are kept sorted by id (ids are allocated monotonically and never
//! reused), so iteration order is stable and deterministic. Removal is
//! idempotent: asking to remove an id twice is harmless.

use serde::{Deserialize, Serialize};

use super::state::{Entity, EntityId, EntityKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate an id and insert the entity built from it
    pub fn spawn(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let mut entity = build(id);
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// Remove an entity, returning it if it was still live
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.index_of(id)?;
        Some(self.entities.remove(idx))
    }

    /// Drop every entity. Ids keep counting so stale ids never alias new ones.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let idx = self.index_of(id)?;
        Some(&self.entities[idx])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let idx = self.index_of(id)?;
        Some(&mut self.entities[idx])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Ids of all live entities at this instant
    pub fn snapshot(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Obstacle { .. }))
    }

    pub fn obstacles_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities
            .iter_mut()
            .filter(|e| matches!(e.kind, EntityKind::Obstacle { .. }))
    }

    pub fn detectors(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Detector { .. }))
    }

    /// Obstacles strictly ahead of `z` along the forward axis
    pub fn count_obstacles_ahead(&self, z: f32) -> usize {
        self.obstacles().filter(|e| e.pos.z > z).count()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::detector::DetectorReaction;
    use crate::sim::state::ObstacleType;
    use glam::Vec3;

    fn cactus_at(z: f32) -> impl FnOnce(EntityId) -> Entity {
        move |id| Entity::obstacle(id, ObstacleType::C0, Vec3::new(0.0, 1.0, z), Vec3::ZERO)
    }

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut reg = Registry::new();
        let a = reg.spawn(cactus_at(10.0));
        let b = reg.spawn(cactus_at(20.0));
        assert!(b > a);
        assert_eq!(reg.snapshot(), vec![a, b]);
        assert_eq!(reg.get(b).unwrap().pos.z, 20.0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut reg = Registry::new();
        let a = reg.spawn(cactus_at(10.0));
        let b = reg.spawn(cactus_at(20.0));

        assert!(reg.remove(a).is_some());
        assert!(reg.remove(a).is_none());
        assert!(!reg.contains(a));
        assert!(reg.contains(b));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut reg = Registry::new();
        let a = reg.spawn(cactus_at(10.0));
        reg.clear();
        assert!(reg.is_empty());
        let b = reg.spawn(cactus_at(10.0));
        assert_ne!(a, b);
        assert!(reg.get(a).is_none());
    }

    #[test]
    fn test_kind_filters() {
        let mut reg = Registry::new();
        reg.spawn(cactus_at(-3.0));
        reg.spawn(cactus_at(5.0));
        reg.spawn(cactus_at(8.0));
        reg.spawn(|id| {
            Entity::detector(
                id,
                Vec3::new(0.0, 1.0, -4.0),
                crate::sim::Aabb::UNIT,
                DetectorReaction::Despawn,
            )
        });

        assert_eq!(reg.obstacles().count(), 3);
        assert_eq!(reg.detectors().count(), 1);
        assert_eq!(reg.count_obstacles_ahead(0.0), 2);
    }
}
