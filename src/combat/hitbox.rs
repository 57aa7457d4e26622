//! Damage zone geometry.
//!
//! A zone is placed relative to its owner: the forward component of the
//! offset is mirrored by the owner's facing sign. Collision itself is
//! resolved outside the core; `contains`/`overlaps_circle` exist for hosts
//! without a physics engine.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoneShape {
    Circle { radius: f32 },
    Box { half_width: f32, half_height: f32 },
}

/// Damage zone owned by an attack instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageZone {
    pub center: Vec2,
    pub shape: ZoneShape,
    pub active: bool,
}

impl DamageZone {
    /// Place a disabled zone at `origin + offset`, mirrored by `facing`
    pub fn placed(origin: Vec2, offset: [f32; 2], facing: f32, shape: ZoneShape) -> Self {
        Self {
            center: Self::anchor(origin, offset, facing),
            shape,
            active: false,
        }
    }

    pub fn anchor(origin: Vec2, offset: [f32; 2], facing: f32) -> Vec2 {
        origin + Vec2::new(offset[0] * facing.signum(), offset[1])
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.overlaps_circle(point, 0.0)
    }

    /// Overlap test against a circular body of `radius` centred at `point`
    pub fn overlaps_circle(&self, point: Vec2, radius: f32) -> bool {
        let radius = radius.max(0.0);
        match self.shape {
            ZoneShape::Circle { radius: r } => self.center.distance(point) <= r + radius,
            ZoneShape::Box {
                half_width,
                half_height,
            } => {
                let half = Vec2::new(half_width, half_height);
                let closest = point.clamp(self.center - half, self.center + half);
                closest.distance(point) <= radius
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_mirrors_with_facing() {
        let shape = ZoneShape::Circle { radius: 1.0 };
        let right = DamageZone::placed(Vec2::ZERO, [2.0, 0.5], 1.0, shape);
        let left = DamageZone::placed(Vec2::ZERO, [2.0, 0.5], -1.0, shape);
        assert_eq!(right.center, Vec2::new(2.0, 0.5));
        assert_eq!(left.center, Vec2::new(-2.0, 0.5));
        assert!(!right.active);
    }

    #[test]
    fn test_circle_contains() {
        let zone = DamageZone::placed(Vec2::ZERO, [0.0, 0.0], 1.0, ZoneShape::Circle { radius: 1.0 });
        assert!(zone.contains(Vec2::new(0.9, 0.0)));
        assert!(!zone.contains(Vec2::new(1.1, 0.0)));
        assert!(zone.overlaps_circle(Vec2::new(1.4, 0.0), 0.5));
    }

    #[test]
    fn test_box_overlap() {
        let zone = DamageZone::placed(
            Vec2::ZERO,
            [0.0, 0.0],
            1.0,
            ZoneShape::Box {
                half_width: 2.0,
                half_height: 0.5,
            },
        );
        assert!(zone.contains(Vec2::new(1.9, 0.4)));
        assert!(!zone.contains(Vec2::new(1.9, 0.6)));
        assert!(zone.overlaps_circle(Vec2::new(2.3, 0.0), 0.5));
        assert!(!zone.overlaps_circle(Vec2::new(3.0, 0.0), 0.5));
    }
}
