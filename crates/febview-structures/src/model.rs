//! The model: objects plus the materials their parts reference.

use febview_core::{BoundingBox, FebviewError, Result};
use glam::Vec3;

use crate::object::Object;

/// A material as far as display is concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Display name.
    pub name: String,
    /// Diffuse color.
    pub diffuse: Vec3,
}

/// A collection of objects and materials.
#[derive(Debug, Clone, Default)]
pub struct Model {
    objects: Vec<Object>,
    materials: Vec<Material>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an object and returns its index.
    pub fn add_object(&mut self, object: Object) -> usize {
        log::debug!("adding object '{}'", object.name);
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Adds a material and returns its index.
    pub fn add_material(&mut self, name: impl Into<String>, diffuse: Vec3) -> usize {
        self.materials.push(Material {
            name: name.into(),
            diffuse,
        });
        self.materials.len() - 1
    }

    /// All objects.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Mutable access to all objects.
    pub fn objects_mut(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    /// Gets an object by index.
    pub fn object(&self, index: usize) -> Result<&Object> {
        self.objects
            .get(index)
            .ok_or(FebviewError::ObjectNotFound(index))
    }

    /// Gets a mutable object by index.
    pub fn object_mut(&mut self, index: usize) -> Result<&mut Object> {
        self.objects
            .get_mut(index)
            .ok_or(FebviewError::ObjectNotFound(index))
    }

    /// All materials.
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Diffuse color of a material, if the index is known.
    #[must_use]
    pub fn material_color(&self, material: Option<usize>) -> Option<Vec3> {
        material
            .and_then(|m| self.materials.get(m))
            .map(|m| m.diffuse)
    }

    /// Total number of display edges over all objects.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.objects
            .iter()
            .filter_map(|o| o.render_mesh.as_ref())
            .map(|m| m.edges().len())
            .sum()
    }

    /// Total number of geometry nodes over all objects.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.objects.iter().map(|o| o.nodes.len()).sum()
    }

    /// World-space bounding box of all visible objects.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for object in self.objects.iter().filter(|o| o.visible) {
            bbox.merge(&object.bounding_box());
        }
        bbox
    }
}
