//! Shared geometry primitives: rays, object transforms and bounding boxes.

use glam::{DQuat, DVec3};

/// A half-line in world (or object-local) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point of the ray.
    pub origin: DVec3,
    /// Direction of the ray. Not required to be unit length.
    pub direction: DVec3,
}

impl Ray {
    /// Creates a new ray.
    #[must_use]
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Creates a ray starting at `from` and passing through `to`.
    ///
    /// Returns `None` when the two points coincide.
    #[must_use]
    pub fn through(from: DVec3, to: DVec3) -> Option<Self> {
        let direction = (to - from).try_normalize()?;
        Some(Self::new(from, direction))
    }

    /// Returns the point at parameter `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Returns whether the direction is (numerically) zero.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.direction.length_squared() < 1e-24
    }
}

/// Placement of an object in the world: scale, then rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation component.
    pub position: DVec3,
    /// Rotation component.
    pub rotation: DQuat,
    /// Per-axis scale component.
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Creates a new identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a transform from a translation.
    #[must_use]
    pub fn from_translation(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Maps a point from object-local to world coordinates.
    #[must_use]
    pub fn local_to_global(&self, r: DVec3) -> DVec3 {
        self.position + self.rotation * (r * self.scale)
    }

    /// Maps a point from world to object-local coordinates.
    #[must_use]
    pub fn global_to_local(&self, r: DVec3) -> DVec3 {
        (self.rotation.inverse() * (r - self.position)) / self.scale
    }

    /// Maps a direction from world to object-local coordinates.
    ///
    /// The result is normalized; a zero input stays zero.
    #[must_use]
    pub fn global_to_local_normal(&self, n: DVec3) -> DVec3 {
        ((self.rotation.inverse() * n) / self.scale).normalize_or_zero()
    }

    /// Maps a world-space ray into object-local coordinates.
    #[must_use]
    pub fn global_to_local_ray(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.global_to_local(ray.origin),
            self.global_to_local_normal(ray.direction),
        )
    }
}

/// An axis-aligned bounding box.
///
/// A freshly created box is empty (invalid) until a point is added.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    r0: DVec3,
    r1: DVec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// Creates an empty box.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            r0: DVec3::splat(f64::MAX),
            r1: DVec3::splat(f64::MIN),
        }
    }

    /// Creates a box from two corners (in any order).
    #[must_use]
    pub fn from_corners(a: DVec3, b: DVec3) -> Self {
        Self {
            r0: a.min(b),
            r1: a.max(b),
        }
    }

    /// Creates the smallest box containing all points.
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.add_point(p);
        }
        bbox
    }

    /// Returns whether the box contains at least one point.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.r0.x <= self.r1.x && self.r0.y <= self.r1.y && self.r0.z <= self.r1.z
    }

    /// Minimum corner.
    #[must_use]
    pub fn r0(&self) -> DVec3 {
        self.r0
    }

    /// Maximum corner.
    #[must_use]
    pub fn r1(&self) -> DVec3 {
        self.r1
    }

    /// Grows the box to include `p`.
    pub fn add_point(&mut self, p: DVec3) {
        self.r0 = self.r0.min(p);
        self.r1 = self.r1.max(p);
    }

    /// Grows the box to include `other`.
    pub fn merge(&mut self, other: &BoundingBox) {
        if other.is_valid() {
            self.add_point(other.r0);
            self.add_point(other.r1);
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> DVec3 {
        (self.r0 + self.r1) * 0.5
    }

    /// Largest side length, or zero for an empty box.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        if self.is_valid() {
            (self.r1 - self.r0).max_element()
        } else {
            0.0
        }
    }

    /// The eight corners in hexahedral reference order
    /// (bottom face counter-clockwise, then top face).
    #[must_use]
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.r0, self.r1);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(b.x, b.y, b.z),
            DVec3::new(a.x, b.y, b.z),
        ]
    }
}
