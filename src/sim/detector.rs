//! Detectors: stationary trigger volumes
//!
//! Each tick every detector scans the registry for entities whose world box
//! overlaps its own and applies its reaction once per hit. The default
//! deployment sits behind the player and despawns obstacles that have passed,
//! which keeps the live obstacle count bounded.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::overlapping_ids;
use super::registry::Registry;
use super::state::{EntityId, EntityKind};
use super::visual::VisualCatalog;
use crate::clamp_to_lane;
use crate::tuning::Tuning;

/// Lateral jitter applied when recycling an obstacle
pub const RECYCLE_LATERAL_JITTER: f32 = 2.0;
/// Forward push range when recycling an obstacle
pub const RECYCLE_FORWARD_MIN: f32 = 32.0;
pub const RECYCLE_FORWARD_MAX: f32 = 57.0;

/// What a detector does to each entity it overlaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectorReaction {
    /// Remove the entity from the registry
    #[default]
    Despawn,
    /// Push an obstacle back up the lane with a fresh variant
    Recycle,
    /// Detect only
    NoOp,
}

/// Shared resources a reaction may draw on
pub struct ReactionContext<'a> {
    pub catalog: &'a VisualCatalog,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
}

/// Per-tick detector tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectorReport {
    pub hits: usize,
    pub despawned: usize,
    pub recycled: usize,
}

/// Entities overlapping the given detector, excluding the detector itself
pub fn scan(registry: &Registry, detector_id: EntityId) -> Vec<EntityId> {
    match registry.get(detector_id) {
        Some(detector) => overlapping_ids(registry, detector, Some(detector_id), |_| true),
        None => Vec::new(),
    }
}

/// Run every live detector once.
///
/// Detectors are taken from a snapshot at the start of the pass; a detector
/// removed by an earlier one is skipped. Each scan collects its hits before
/// any reaction runs, and a target already gone is silently ignored.
pub fn run_detectors(registry: &mut Registry, ctx: &mut ReactionContext<'_>) -> DetectorReport {
    let detector_ids: Vec<(EntityId, DetectorReaction)> = registry
        .detectors()
        .filter_map(|e| match e.kind {
            EntityKind::Detector { reaction } => Some((e.id, reaction)),
            EntityKind::Obstacle { .. } => None,
        })
        .collect();

    let mut report = DetectorReport::default();
    for (detector_id, reaction) in detector_ids {
        if !registry.contains(detector_id) {
            continue;
        }
        for target in scan(registry, detector_id) {
            report.hits += 1;
            apply_reaction(registry, target, reaction, ctx, &mut report);
        }
    }

    if report.despawned > 0 || report.recycled > 0 {
        log::debug!(
            "detectors: {} hits, {} despawned, {} recycled",
            report.hits,
            report.despawned,
            report.recycled
        );
    }
    report
}

fn apply_reaction(
    registry: &mut Registry,
    target: EntityId,
    reaction: DetectorReaction,
    ctx: &mut ReactionContext<'_>,
    report: &mut DetectorReport,
) {
    match reaction {
        DetectorReaction::Despawn => {
            if registry.remove(target).is_some() {
                report.despawned += 1;
            }
        }
        DetectorReaction::Recycle => {
            let Some(entity) = registry.get_mut(target) else {
                return;
            };
            let EntityKind::Obstacle { ty } = entity.kind else {
                return;
            };
            let dx = ctx
                .rng
                .random_range(-RECYCLE_LATERAL_JITTER..RECYCLE_LATERAL_JITTER);
            let dz = ctx.rng.random_range(RECYCLE_FORWARD_MIN..RECYCLE_FORWARD_MAX);
            entity.pos += Vec3::new(dx, 0.0, dz);
            entity.pos.x = clamp_to_lane(entity.pos.x, ctx.tuning.lane_half_width);

            if let Some(key) = ctx.catalog.random_key(&entity.visual, &mut *ctx.rng) {
                entity.state_key = key.to_owned();
            }
            entity.bounds = ctx
                .catalog
                .bounds_for(&entity.visual, &entity.state_key)
                .unwrap_or_else(|| ty.default_bounds());
            report.recycled += 1;
        }
        DetectorReaction::NoOp => {}
    }
}
