//! Model objects and their geometry-level items.

use febview_core::{BoundingBox, Transform};
use glam::DVec3;

use crate::fe_mesh::FeMesh;
use crate::render_mesh::RenderMesh;

/// A part of an object, carrying the material assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Display name.
    pub name: String,
    /// Whether the part is shown.
    pub visible: bool,
    /// Whether the part is selected.
    pub selected: bool,
    /// Index into the model's materials.
    pub material: Option<usize>,
}

impl Part {
    /// Creates a visible part without a material.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            selected: false,
            material: None,
        }
    }
}

/// A geometry vertex in object-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoNode {
    /// Local position.
    pub position: DVec3,
    /// Whether the node is shown.
    pub visible: bool,
    /// Whether the node is selected.
    pub selected: bool,
}

/// Selection state of a geometry edge or surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoItem {
    /// Whether the item is selected.
    pub selected: bool,
}

/// An object in the model.
#[derive(Debug, Clone)]
pub struct Object {
    /// Display name.
    pub name: String,
    /// Whether the object is shown.
    pub visible: bool,
    /// Whether the object is selected.
    pub selected: bool,
    /// Placement in the world.
    pub transform: Transform,
    /// Parts of the object.
    pub parts: Vec<Part>,
    /// Geometry vertices.
    pub nodes: Vec<GeoNode>,
    /// Geometry edges, referenced by [`crate::RenderEdge::edge`].
    pub edges: Vec<GeoItem>,
    /// Geometry surfaces, referenced by [`crate::RenderFace::surface`].
    pub surfaces: Vec<GeoItem>,
    /// Display mesh.
    pub render_mesh: Option<RenderMesh>,
    /// Finite element mesh.
    pub fe_mesh: Option<FeMesh>,
}

impl Object {
    /// Creates an empty visible object.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            selected: false,
            transform: Transform::identity(),
            parts: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            surfaces: Vec::new(),
            render_mesh: None,
            fe_mesh: None,
        }
    }

    /// Creates an object around a finite element mesh.
    ///
    /// Builds the display mesh from the mesh boundary, one part and one
    /// surface per part id, and one geometry edge per boundary edge.
    pub fn from_fe_mesh(name: impl Into<String>, mut mesh: FeMesh) -> Self {
        if mesh.faces().is_empty() {
            mesh.build_faces();
        }
        let part_count = mesh.elements().iter().map(|e| e.part + 1).max().unwrap_or(0);
        let render = RenderMesh::from_fe_mesh(&mesh);

        let mut object = Self::new(name);
        object.parts = (0..part_count)
            .map(|i| Part::new(format!("Part{}", i + 1)))
            .collect();
        object.surfaces = vec![GeoItem::default(); part_count];
        object.edges = vec![GeoItem::default(); render.edges().len()];
        object.render_mesh = Some(render);
        object.fe_mesh = Some(mesh);
        object
    }

    /// Returns whether the part exists and is shown.
    #[must_use]
    pub fn is_part_visible(&self, part: usize) -> bool {
        self.parts.get(part).is_some_and(|p| p.visible)
    }

    /// World-space bounding box of the object's meshes and geometry nodes.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let t = &self.transform;
        let mut bbox = BoundingBox::empty();
        if let Some(fe) = &self.fe_mesh {
            for n in fe.nodes() {
                bbox.add_point(t.local_to_global(n.position));
            }
        }
        if let Some(render) = &self.render_mesh {
            for &p in render.nodes() {
                bbox.add_point(t.local_to_global(p));
            }
        }
        for n in &self.nodes {
            bbox.add_point(t.local_to_global(n.position));
        }
        bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fe_mesh::tests::hex_bar;

    #[test]
    fn test_from_fe_mesh() {
        let object = Object::from_fe_mesh("bar", hex_bar(2));
        assert_eq!(object.parts.len(), 1);
        assert_eq!(object.surfaces.len(), 1);
        assert_eq!(object.edges.len(), 20);
        assert!(object.is_part_visible(0));
        assert!(!object.is_part_visible(1));
    }

    #[test]
    fn test_bounding_box_is_world_space() {
        let mut object = Object::from_fe_mesh("bar", hex_bar(1));
        object.transform = Transform::from_translation(DVec3::new(10.0, 0.0, 0.0));
        let bbox = object.bounding_box();
        assert_eq!(bbox.r0(), DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(bbox.r1(), DVec3::new(11.0, 1.0, 1.0));
    }
}
