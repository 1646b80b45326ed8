//! The document a view works on.

use febview_core::{Camera, ColorMap, ColorMapRegistry, Grid, Result, ViewSettings};
use febview_structures::{MeshMode, Model, Object, SelectionTarget};
use glam::DVec3;

/// A model together with the interaction state that belongs to it.
#[derive(Debug, Clone)]
pub struct Document {
    /// The model being viewed.
    pub model: Model,
    /// View configuration.
    pub settings: ViewSettings,
    /// Available color maps.
    pub color_maps: ColorMapRegistry,
    /// The camera.
    pub camera: Camera,
    /// The construction grid.
    pub grid: Grid,
    /// Index of the object mesh-level tools work on.
    pub active_object: Option<usize>,
    /// An object under construction, whose nodes are picked first.
    pub temp_object: Option<Object>,
    /// Granularity of selection gestures.
    pub selection_target: SelectionTarget,
    /// Volume or surface selection of mesh items.
    pub mesh_mode: MeshMode,
    /// The last picked point.
    pub cursor: DVec3,
}

impl Document {
    /// Creates a document with default settings.
    #[must_use]
    pub fn new(model: Model) -> Self {
        Self {
            model,
            settings: ViewSettings::default(),
            color_maps: ColorMapRegistry::new(),
            camera: Camera::new(),
            grid: Grid::default(),
            active_object: None,
            temp_object: None,
            selection_target: SelectionTarget::default(),
            mesh_mode: MeshMode::default(),
            cursor: DVec3::ZERO,
        }
    }

    /// Creates a document with settings parsed from JSON.
    pub fn with_settings_json(model: Model, json: &str) -> Result<Self> {
        let mut doc = Self::new(model);
        doc.settings = ViewSettings::from_json(json)?;
        Ok(doc)
    }

    /// Sets the active object, ignoring indices that do not exist.
    pub fn set_active_object(&mut self, index: Option<usize>) {
        match index {
            Some(i) if self.model.object(i).is_err() => {
                log::warn!("ignoring unknown active object {i}");
            }
            _ => self.active_object = index,
        }
    }

    /// The color map for contour display, if contours are shown.
    #[must_use]
    pub fn contour_map(&self) -> Option<&ColorMap> {
        if !self.settings.show_contour {
            return None;
        }
        let map = self.color_maps.get(&self.settings.color_map);
        if map.is_none() {
            log::warn!("unknown color map '{}'", self.settings.color_map);
        }
        map
    }

    /// Points the camera at the visible model.
    pub fn zoom_extents(&mut self) {
        let bbox = self.model.bounding_box();
        if bbox.is_valid() {
            self.camera.look_at_box(&bbox);
        }
    }
}
