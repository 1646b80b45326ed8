//! The construction grid: a plane in world space used as a picking fallback.

use glam::{DQuat, DVec3};

use crate::math::Ray;

/// A reference grid lying in the local XY plane of its own frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Origin of the grid plane.
    pub origin: DVec3,
    /// Orientation of the grid frame. The plane normal is the rotated Z axis.
    pub orientation: DQuat,
    /// Spacing between grid lines. Non-positive values disable snapping.
    pub scale: f64,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            origin: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
            scale: 1.0,
        }
    }
}

impl Grid {
    /// Normal of the grid plane in world space.
    #[must_use]
    pub fn normal(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }

    /// Maps a world point into the grid frame.
    #[must_use]
    pub fn world_to_plane(&self, r: DVec3) -> DVec3 {
        self.orientation.inverse() * (r - self.origin)
    }

    /// Intersects the ray with the grid plane.
    ///
    /// With `snap` set, the hit is moved to the nearest grid line crossing.
    /// Returns `None` when the ray is parallel to the plane or the plane lies
    /// behind the ray origin.
    #[must_use]
    pub fn intersect(&self, ray: &Ray, snap: bool) -> Option<DVec3> {
        let n = self.normal();
        let denom = ray.direction.dot(n);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = (self.origin - ray.origin).dot(n) / denom;
        if t < 0.0 {
            return None;
        }

        let hit = ray.at(t);
        if !snap || self.scale <= 0.0 {
            return Some(hit);
        }

        let local = self.world_to_plane(hit);
        let g = self.scale;
        let snapped = DVec3::new((local.x / g).round() * g, (local.y / g).round() * g, 0.0);
        Some(self.origin + self.orientation * snapped)
    }
}
