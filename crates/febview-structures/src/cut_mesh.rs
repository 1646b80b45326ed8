//! The cross-section mesh produced by a plane cut.

use febview_core::BoundingBox;
use glam::DVec3;

/// An RGBA color with 8 bits per channel.
pub type Rgba = [u8; 4];

/// A triangle of the cut surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CutFace {
    /// World-space corner positions.
    pub positions: [DVec3; 3],
    /// Per-corner colors.
    pub colors: [Rgba; 3],
    /// Unit face normal, filled in by [`CutMesh::finalize`].
    pub normal: DVec3,
    /// Index of the object the element belongs to.
    pub object: usize,
    /// Index of the element that was cut.
    pub element: usize,
    /// Whether the cut element is selected.
    pub selected: bool,
}

/// An outline edge of the cut surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CutEdge {
    /// World-space end positions.
    pub positions: [DVec3; 2],
    /// Whether the cut element is selected.
    pub selected: bool,
}

/// Vertex record for uploading cut faces to a renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CutVertex {
    /// Position.
    pub position: [f32; 3],
    /// Face normal.
    pub normal: [f32; 3],
    /// Color.
    pub color: Rgba,
}

/// Triangles and outline edges of a plane cut.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutMesh {
    /// Cut triangles in element order.
    pub faces: Vec<CutFace>,
    /// Outline edges in element order.
    pub edges: Vec<CutEdge>,
    bounds: BoundingBox,
}

impl CutMesh {
    /// Creates an empty cut mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the cut produced no triangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Bounds of all face corners, valid after [`CutMesh::finalize`].
    #[must_use]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Computes face normals and the bounding box.
    pub fn finalize(&mut self) {
        let mut bounds = BoundingBox::empty();
        for face in &mut self.faces {
            let [a, b, c] = face.positions;
            face.normal = (b - a).cross(c - a).normalize_or_zero();
            for p in face.positions {
                bounds.add_point(p);
            }
        }
        self.bounds = bounds;
    }

    /// Flattens the faces into renderer vertices, three per face.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn vertices(&self) -> Vec<CutVertex> {
        self.faces
            .iter()
            .flat_map(|face| {
                let normal = face.normal.as_vec3().to_array();
                (0..3).map(move |i| CutVertex {
                    position: face.positions[i].as_vec3().to_array(),
                    normal,
                    color: face.colors[i],
                })
            })
            .collect()
    }
}
