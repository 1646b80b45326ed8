//! Camera and the screen/world projection used for picking.

use glam::{DMat4, DVec3, DVec4, IVec2};
use serde::{Deserialize, Serialize};

use crate::math::{BoundingBox, Ray};

/// Camera projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// Perspective projection.
    #[default]
    Perspective,
    /// Orthographic projection.
    Orthographic,
}

/// A 3D camera for viewing the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: DVec3,
    /// Point the camera is looking at.
    pub target: DVec3,
    /// Up vector.
    pub up: DVec3,
    /// Vertical field of view in radians.
    pub fov: f64,
    /// Near clipping plane.
    pub near: f64,
    /// Far clipping plane.
    pub far: f64,
    /// Projection mode.
    pub projection_mode: ProjectionMode,
    /// Half-height of the view volume in orthographic mode.
    pub ortho_scale: f64,
}

impl Camera {
    /// Creates a new camera with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 3.0),
            target: DVec3::ZERO,
            up: DVec3::Y,
            fov: std::f64::consts::FRAC_PI_4,
            near: 0.01,
            far: 1000.0,
            projection_mode: ProjectionMode::Perspective,
            ortho_scale: 1.0,
        }
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix for the given aspect ratio (width / height).
    #[must_use]
    pub fn projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        match self.projection_mode {
            ProjectionMode::Perspective => {
                DMat4::perspective_rh(self.fov, aspect_ratio, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.ortho_scale;
                let half_width = half_height * aspect_ratio;
                let dist = (self.position - self.target).length();
                let depth = (dist + self.far).max(self.ortho_scale * 100.0);
                DMat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    -depth,
                    depth,
                )
            }
        }
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self, aspect_ratio: f64) -> DMat4 {
        self.projection_matrix(aspect_ratio) * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> DVec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Distance from the camera to its target.
    #[must_use]
    pub fn target_distance(&self) -> f64 {
        (self.position - self.target).length()
    }

    /// Moves the target, keeping the viewing direction and distance.
    pub fn set_target(&mut self, target: DVec3) {
        self.position += target - self.target;
        self.target = target;
    }

    /// Moves the camera along its viewing direction to `distance` from the
    /// target.
    ///
    /// The orthographic view height follows the distance, so both
    /// projections frame the same region.
    pub fn set_target_distance(&mut self, distance: f64) {
        let direction = self.forward().try_normalize().unwrap_or(DVec3::NEG_Z);
        let distance = distance.max(1e-6);
        self.position = self.target - direction * distance;
        self.ortho_scale = distance * (self.fov * 0.5).tan();
        if self.far < distance * 10.0 {
            self.far = distance * 10.0;
        }
    }

    /// Moves the camera so the whole box is in view.
    pub fn look_at_box(&mut self, bbox: &BoundingBox) {
        if !bbox.is_valid() {
            return;
        }
        let center = bbox.center();
        let size = (bbox.r1() - bbox.r0()).length().max(1e-3);

        self.target = center;
        self.position = center + DVec3::new(0.0, 0.0, size * 1.5);
        self.near = size * 0.001;
        self.far = size * 100.0;
        self.ortho_scale = (size * 0.6).max(0.1);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// A frozen camera plus viewport, mapping between world and screen space.
///
/// Screen coordinates are pixels with the origin at the top-left corner.
/// The depth returned by [`ViewTransform::world_to_screen`] is the
/// normalized device depth in `[0, 1]`; smaller values are closer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    view_proj: DMat4,
    inv_view_proj: DMat4,
    width: u32,
    height: u32,
}

impl ViewTransform {
    /// Captures the camera for a viewport of `width` x `height` pixels.
    #[must_use]
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        let aspect = if height == 0 {
            1.0
        } else {
            f64::from(width) / f64::from(height)
        };
        let view_proj = camera.view_projection_matrix(aspect);
        Self {
            view_proj,
            inv_view_proj: view_proj.inverse(),
            width,
            height,
        }
    }

    /// Viewport width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Projects a world point to `(x, y, depth)` in screen space.
    #[must_use]
    pub fn world_to_screen(&self, p: DVec3) -> DVec3 {
        let clip = self.view_proj * p.extend(1.0);
        let w = if clip.w.abs() < 1e-12 { 1e-12 } else { clip.w };
        let ndc = clip.truncate() / w;
        let half_width = f64::from(self.width) * 0.5;
        let half_height = f64::from(self.height) * 0.5;
        DVec3::new(
            (ndc.x + 1.0) * half_width,
            (1.0 - ndc.y) * half_height,
            ndc.z,
        )
    }

    /// Projects a world point and truncates it to integer pixels.
    ///
    /// Also returns the depth of the projected point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_pixel(&self, p: DVec3) -> (IVec2, f64) {
        let s = self.world_to_screen(p);
        (IVec2::new(s.x as i32, s.y as i32), s.z)
    }

    /// Builds the world-space ray through the pixel `(x, y)`.
    ///
    /// Returns `None` for an empty viewport or a singular projection.
    #[must_use]
    pub fn point_to_ray(&self, x: i32, y: i32) -> Option<Ray> {
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let half_width = f64::from(self.width) * 0.5;
        let half_height = f64::from(self.height) * 0.5;
        let ndc_x = f64::from(x) / half_width - 1.0;
        let ndc_y = 1.0 - f64::from(y) / half_height;

        let near = self.inv_view_proj * DVec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = self.inv_view_proj * DVec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < 1e-12 || far.w.abs() < 1e-12 {
            return None;
        }

        let origin = near.truncate() / near.w;
        let target = far.truncate() / far.w;
        if !origin.is_finite() || !target.is_finite() {
            return None;
        }
        Ray::through(origin, target)
    }
}
