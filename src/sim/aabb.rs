//! Axis-aligned bounding boxes
//!
//! Boxes are stored in an entity's local space and translated by the entity
//! position for world-space tests. There is no rotation or scale.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// An axis-aligned box with `min <= max` on every axis
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "Corners")]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

/// Unvalidated wire form
#[derive(Deserialize)]
struct Corners {
    min: Vec3,
    max: Vec3,
}

impl TryFrom<Corners> for Aabb {
    type Error = SimError;

    fn try_from(c: Corners) -> Result<Self> {
        Aabb::new(c.min, c.max)
    }
}

impl Aabb {
    /// Unit cube at the local origin
    pub const UNIT: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ONE,
    };

    /// Build a box, rejecting inverted (or NaN) bounds
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        for (axis, lo, hi) in [('x', min.x, max.x), ('y', min.y, max.y), ('z', min.z, max.z)] {
            // written this way so NaN fails too
            if !(lo <= hi) {
                return Err(SimError::InvalidAabb { axis, min: lo, max: hi });
            }
        }
        Ok(Self { min, max })
    }

    /// Compile-time boxes whose corners are known to be ordered
    pub(crate) const fn from_ordered(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The same box shifted by `offset`
    #[inline]
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Closed-interval overlap on all three axes (touching faces count)
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
            && (self.min.z <= other.max.z && self.max.z >= other.min.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = Aabb::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, SimError::InvalidAabb { axis: 'y', .. }));

        assert!(Aabb::new(Vec3::ZERO, Vec3::new(f32::NAN, 1.0, 1.0)).is_err());
        // Degenerate (flat) boxes are fine
        assert!(Aabb::new(Vec3::ONE, Vec3::ONE).is_ok());
    }

    #[test]
    fn test_size_and_center() {
        let b = Aabb::new(Vec3::new(-9.0, 0.0, 0.0), Vec3::new(4.0, 18.0, 0.5)).unwrap();
        assert_eq!(b.size(), Vec3::new(13.0, 18.0, 0.5));
        assert_eq!(b.center(), Vec3::new(-2.5, 9.0, 0.25));
    }

    #[test]
    fn test_unit_boxes_overlap_and_separate() {
        let a = Aabb::UNIT.translated(Vec3::ZERO);
        assert!(a.intersects(&Aabb::UNIT.translated(Vec3::new(0.5, 0.0, 0.0))));
        assert!(!a.intersects(&Aabb::UNIT.translated(Vec3::new(2.0, 0.0, 0.0))));
        // Shared face is an overlap
        assert!(a.intersects(&Aabb::UNIT.translated(Vec3::new(1.0, 0.0, 0.0))));
        // Separation on a single axis is enough
        assert!(!a.intersects(&Aabb::UNIT.translated(Vec3::new(0.0, 0.0, -1.5))));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Aabb = serde_json::from_str(r#"{"min":[0,0,0],"max":[1,2,3]}"#).unwrap();
        assert_eq!(ok.max(), Vec3::new(1.0, 2.0, 3.0));

        let bad = serde_json::from_str::<Aabb>(r#"{"min":[0,5,0],"max":[1,2,3]}"#);
        assert!(bad.is_err());
    }

    // Integer-valued coordinates keep float addition exact, so translation
    // cannot merge two distinct edges through rounding.
    fn coord() -> impl Strategy<Value = f32> {
        (-64i32..64).prop_map(|v| v as f32)
    }

    fn vec3() -> impl Strategy<Value = Vec3> {
        (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn aabb() -> impl Strategy<Value = Aabb> {
        (vec3(), (0i32..16, 0i32..16, 0i32..16)).prop_map(|(min, (sx, sy, sz))| {
            Aabb::new(min, min + Vec3::new(sx as f32, sy as f32, sz as f32)).unwrap()
        })
    }

    proptest! {
        #[test]
        fn prop_intersects_is_symmetric(a in aabb(), b in aabb()) {
            prop_assert_eq!(a.intersects(&b), b.intersects(&a));
        }

        #[test]
        fn prop_intersects_is_translation_invariant(a in aabb(), b in aabb(), t in vec3()) {
            prop_assert_eq!(a.intersects(&b), a.translated(t).intersects(&b.translated(t)));
        }

        #[test]
        fn prop_box_intersects_itself(a in aabb()) {
            prop_assert!(a.intersects(&a));
        }
    }
}
