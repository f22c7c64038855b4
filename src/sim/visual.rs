//! Visual handles and named-variant catalog
//!
//! The simulation never looks at geometry. Each entity carries an opaque
//! [`VisualHandle`] plus a state key naming one variant of it; the catalog
//! tells the core which keys exist so it can pick among them.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

pub const PLAYER_VISUAL: &str = "core:player";
pub const CACTUS_VISUAL: &str = "core:cactus";
pub const DETECTOR_VISUAL: &str = "core:detector";
pub const WORLD_VISUAL: &str = "core:world";

pub const PLAYER_IDLE: &str = "idle";
pub const PLAYER_MOVE: &str = "move";

/// Opaque reference to a renderer-owned model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisualHandle(String);

impl VisualHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Variant keys exposed by one visual, in catalog order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantSet {
    pub keys: Vec<String>,
    /// Optional per-variant collision bounds (computed by the asset side)
    #[serde(default)]
    pub bounds: BTreeMap<String, Aabb>,
}

/// Per-visual variant keys supplied by the model system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisualCatalog {
    variants: BTreeMap<VisualHandle, VariantSet>,
}

impl VisualCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog matching the stock asset pack
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.register(VisualHandle::new(PLAYER_VISUAL), [PLAYER_IDLE, PLAYER_MOVE]);
        catalog.register(VisualHandle::new(CACTUS_VISUAL), ["0", "1", "2"]);
        catalog.register(VisualHandle::new(DETECTOR_VISUAL), ["box"]);
        catalog.register(VisualHandle::new(WORLD_VISUAL), ["0"]);
        catalog
    }

    /// Register (or replace) the variant keys of a visual
    pub fn register<I, S>(&mut self, handle: VisualHandle, keys: I) -> &mut VariantSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.variants.entry(handle).or_default();
        set.keys = keys.into_iter().map(Into::into).collect();
        set
    }

    /// Attach collision bounds to one variant
    pub fn register_bounds(&mut self, handle: &VisualHandle, key: &str, aabb: Aabb) {
        if let Some(set) = self.variants.get_mut(handle) {
            set.bounds.insert(key.to_owned(), aabb);
        } else {
            log::warn!("bounds for unknown visual {}", handle.as_str());
        }
    }

    /// Known keys for a visual (empty if the visual is unregistered)
    pub fn keys(&self, handle: &VisualHandle) -> &[String] {
        self.variants
            .get(handle)
            .map(|set| set.keys.as_slice())
            .unwrap_or(&[])
    }

    /// Return `requested` if the visual has it, otherwise its first key.
    ///
    /// A visual with no registered keys keeps the requested key unchanged.
    pub fn resolve_key(&self, handle: &VisualHandle, requested: &str) -> String {
        let keys = self.keys(handle);
        if keys.is_empty() || keys.iter().any(|k| k == requested) {
            return requested.to_owned();
        }
        log::warn!(
            "variant '{}' missing on {}, using '{}'",
            requested,
            handle.as_str(),
            keys[0]
        );
        keys[0].clone()
    }

    /// Uniformly random key of a visual
    pub fn random_key<R: Rng>(&self, handle: &VisualHandle, rng: &mut R) -> Option<&str> {
        let keys = self.keys(handle);
        if keys.is_empty() {
            return None;
        }
        Some(keys[rng.random_range(0..keys.len())].as_str())
    }

    /// Per-variant bounds, if the asset side supplied them
    pub fn bounds_for(&self, handle: &VisualHandle, key: &str) -> Option<Aabb> {
        self.variants.get(handle)?.bounds.get(key).copied()
    }
}
