//! View settings that affect picking, selection and plane cuts.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color_map::DEFAULT_COLOR_MAP;
use crate::error::Result;
use crate::region::RegionStyle;
use crate::screen::PICK_TOLERANCE;

/// Largest accepted pick tolerance in pixels.
pub const MAX_PICK_TOLERANCE: i32 = 100;

/// User-facing view configuration.
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Paint plane cuts of the active object with its contour data.
    pub show_contour: bool,

    /// Snap picked points to the nearest node of the hit face.
    pub snap_to_node: bool,

    /// Snap grid picks to grid line crossings.
    pub snap_to_grid: bool,

    /// Pick on the construction grid when no object mesh is active.
    ///
    /// With this off, picking an empty or hidden model finds nothing.
    pub grid_picking: bool,

    /// Color for parts whose material is unknown.
    pub default_color: Vec3,

    /// Color for elements without contour data.
    pub unassigned_data_color: Vec3,

    /// Color for selected elements on a flat-shaded plane cut.
    pub selection_color: Vec3,

    /// Half-size in pixels of the click and highlight tolerance box,
    /// clamped to `0..=MAX_PICK_TOLERANCE` when loaded.
    pub pick_tolerance: i32,

    /// Shape built by a drag gesture.
    pub region_style: RegionStyle,

    /// Name of the color map used for contours.
    pub color_map: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_contour: false,
            snap_to_node: false,
            snap_to_grid: true,
            grid_picking: true,
            default_color: Vec3::splat(200.0 / 255.0),
            unassigned_data_color: Vec3::splat(212.0 / 255.0),
            selection_color: Vec3::new(1.0, 0.0, 0.0),
            pick_tolerance: PICK_TOLERANCE,
            region_style: RegionStyle::Box,
            color_map: DEFAULT_COLOR_MAP.to_string(),
        }
    }
}

impl ViewSettings {
    /// Parses settings from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        let tolerance = settings.pick_tolerance.clamp(0, MAX_PICK_TOLERANCE);
        if tolerance != settings.pick_tolerance {
            log::warn!(
                "pick tolerance {} out of range, using {tolerance}",
                settings.pick_tolerance
            );
            settings.pick_tolerance = tolerance;
        }
        log::debug!(
            "loaded view settings (region style {:?}, color map '{}')",
            settings.region_style,
            settings.color_map
        );
        Ok(settings)
    }

    /// Serializes the settings to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }
}
