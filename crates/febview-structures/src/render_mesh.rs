//! Triangulated display mesh of an object.

use febview_core::{FebviewError, Result};
use glam::DVec3;

use crate::fe_mesh::FeMesh;

/// A display edge, optionally tied to a geometry edge of the owning object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderEdge {
    /// End node indices.
    pub nodes: [usize; 2],
    /// Geometry edge this segment belongs to.
    pub edge: Option<usize>,
}

/// A display triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFace {
    /// Corner node indices, counter-clockwise seen from outside.
    pub nodes: [usize; 3],
    /// Geometry surface this triangle belongs to.
    pub surface: usize,
    /// Part this triangle belongs to.
    pub part: usize,
}

/// The display mesh of an object in object-local coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderMesh {
    nodes: Vec<DVec3>,
    edges: Vec<RenderEdge>,
    faces: Vec<RenderFace>,
}

impl RenderMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the display mesh of a finite element mesh's boundary.
    ///
    /// Quads are split into two triangles. Each boundary face is assigned
    /// to the part (and surface) of its element, and edge `i` of the FE mesh
    /// becomes geometry edge `i`.
    #[must_use]
    pub fn from_fe_mesh(mesh: &FeMesh) -> Self {
        let mut render = Self {
            nodes: mesh.nodes().iter().map(|n| n.position).collect(),
            ..Self::default()
        };

        for face in mesh.faces().iter().filter(|f| f.is_exterior()) {
            let part = face.elements[0].map_or(0, |ei| mesh.elements()[ei].part);
            let n = &face.nodes;
            for i in 1..n.len().saturating_sub(1) {
                render.faces.push(RenderFace {
                    nodes: [n[0], n[i], n[i + 1]],
                    surface: part,
                    part,
                });
            }
        }

        render.edges = mesh
            .edges()
            .iter()
            .enumerate()
            .map(|(i, e)| RenderEdge {
                nodes: e.nodes,
                edge: Some(i),
            })
            .collect();
        render
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, position: DVec3) -> usize {
        self.nodes.push(position);
        self.nodes.len() - 1
    }

    /// Adds an edge and returns its index.
    pub fn add_edge(&mut self, nodes: [usize; 2], edge: Option<usize>) -> Result<usize> {
        self.check_nodes(&nodes)?;
        self.edges.push(RenderEdge { nodes, edge });
        Ok(self.edges.len() - 1)
    }

    /// Adds a triangle and returns its index.
    pub fn add_face(&mut self, nodes: [usize; 3], surface: usize, part: usize) -> Result<usize> {
        self.check_nodes(&nodes)?;
        self.faces.push(RenderFace {
            nodes,
            surface,
            part,
        });
        Ok(self.faces.len() - 1)
    }

    fn check_nodes(&self, nodes: &[usize]) -> Result<()> {
        match nodes.iter().find(|&&n| n >= self.nodes.len()) {
            Some(&index) => Err(FebviewError::NodeIndexOutOfRange {
                index,
                count: self.nodes.len(),
            }),
            None => Ok(()),
        }
    }

    /// Node positions.
    #[must_use]
    pub fn nodes(&self) -> &[DVec3] {
        &self.nodes
    }

    /// Edges.
    #[must_use]
    pub fn edges(&self) -> &[RenderEdge] {
        &self.edges
    }

    /// Triangles.
    #[must_use]
    pub fn faces(&self) -> &[RenderFace] {
        &self.faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fe_mesh::tests::hex_bar;

    #[test]
    fn test_from_fe_mesh() {
        let fe = hex_bar(2);
        let render = RenderMesh::from_fe_mesh(&fe);
        // 10 boundary quads, two triangles each
        assert_eq!(render.faces().len(), 20);
        assert_eq!(render.edges().len(), fe.edges().len());
        assert_eq!(render.edges()[3].edge, Some(3));
        assert_eq!(render.nodes().len(), fe.nodes().len());
    }

    #[test]
    fn test_add_validates_nodes() {
        let mut mesh = RenderMesh::new();
        mesh.add_node(DVec3::ZERO);
        mesh.add_node(DVec3::X);
        assert!(mesh.add_edge([0, 1], None).is_ok());
        assert!(mesh.add_face([0, 1, 2], 0, 0).is_err());
    }
}
