//! Finite element mesh: nodes, elements, faces and edges with their flags.

use std::collections::{HashMap, HashSet};

use febview_core::{BoundingBox, FebviewError, Result};
use glam::DVec3;

use crate::element::{Element, ElementType};
use crate::mesh_data::MeshData;

/// A mesh node in object-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Local position.
    pub position: DVec3,
    /// Scratch tag written by mesh algorithms.
    pub tag: i32,
    /// Whether the node is shown.
    pub visible: bool,
    /// Whether the node is selected.
    pub selected: bool,
}

/// A mesh face shared by at most two elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Corner node indices (three or four), ordered outward from `elements[0]`.
    pub nodes: Vec<usize>,
    /// Adjacent elements. The second slot is empty for boundary faces.
    pub elements: [Option<usize>; 2],
    /// Whether the face is shown.
    pub visible: bool,
    /// Whether the face is selected.
    pub selected: bool,
}

impl Face {
    /// Returns whether the face lies on the mesh boundary.
    #[must_use]
    pub fn is_exterior(&self) -> bool {
        self.elements[1].is_none()
    }
}

/// A mesh edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// End node indices.
    pub nodes: [usize; 2],
    /// Whether the edge is shown.
    pub visible: bool,
    /// Whether the edge is selected.
    pub selected: bool,
}

/// A finite element mesh.
///
/// Element, face and edge construction validates node references, so every
/// stored index is in range.
#[derive(Debug, Clone, Default)]
pub struct FeMesh {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    faces: Vec<Face>,
    edges: Vec<Edge>,
    data: Option<MeshData>,
}

impl FeMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its index.
    pub fn add_node(&mut self, position: DVec3) -> usize {
        self.nodes.push(Node {
            position,
            tag: 0,
            visible: true,
            selected: false,
        });
        self.nodes.len() - 1
    }

    /// Adds an element and returns its index.
    pub fn add_element(
        &mut self,
        element_type: ElementType,
        nodes: Vec<usize>,
        part: usize,
    ) -> Result<usize> {
        if nodes.len() != element_type.node_count() {
            return Err(FebviewError::NodeCountMismatch {
                element_type: element_type.name(),
                expected: element_type.node_count(),
                actual: nodes.len(),
            });
        }
        self.check_nodes(&nodes)?;
        self.elements.push(Element {
            element_type,
            nodes,
            part,
            visible: true,
            selected: false,
        });
        Ok(self.elements.len() - 1)
    }

    /// Adds a face and returns its index.
    pub fn add_face(&mut self, nodes: Vec<usize>, elements: [Option<usize>; 2]) -> Result<usize> {
        self.check_nodes(&nodes)?;
        for el in elements.into_iter().flatten() {
            if el >= self.elements.len() {
                return Err(FebviewError::ElementIndexOutOfRange {
                    index: el,
                    count: self.elements.len(),
                });
            }
        }
        self.faces.push(Face {
            nodes,
            elements,
            visible: true,
            selected: false,
        });
        Ok(self.faces.len() - 1)
    }

    /// Adds an edge and returns its index.
    pub fn add_edge(&mut self, nodes: [usize; 2]) -> Result<usize> {
        self.check_nodes(&nodes)?;
        self.edges.push(Edge {
            nodes,
            visible: true,
            selected: false,
        });
        Ok(self.edges.len() - 1)
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

    /// Rebuilds faces and edges from the element topology.
    ///
    /// Faces shared by two elements are stored once with both neighbors.
    /// Edges are the distinct edges of the boundary faces.
    pub fn build_faces(&mut self) {
        let mut faces: Vec<Face> = Vec::new();
        let mut lookup: HashMap<Vec<usize>, usize> = HashMap::new();

        for (ei, el) in self.elements.iter().enumerate() {
            for local in el.element_type.faces() {
                let nodes: Vec<usize> = local.iter().map(|&c| el.nodes[c]).collect();
                let mut key = nodes.clone();
                key.sort_unstable();
                match lookup.get(&key) {
                    Some(&fi) if faces[fi].elements[1].is_none() => {
                        faces[fi].elements[1] = Some(ei);
                    }
                    _ => {
                        lookup.insert(key, faces.len());
                        faces.push(Face {
                            nodes,
                            elements: [Some(ei), None],
                            visible: true,
                            selected: false,
                        });
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for face in faces.iter().filter(|f| f.is_exterior()) {
            let n = face.nodes.len();
            for i in 0..n {
                let (a, b) = (face.nodes[i], face.nodes[(i + 1) % n]);
                if seen.insert((a.min(b), a.max(b))) {
                    edges.push(Edge {
                        nodes: [a, b],
                        visible: true,
                        selected: false,
                    });
                }
            }
        }

        log::debug!(
            "built {} faces and {} edges for {} elements",
            faces.len(),
            edges.len(),
            self.elements.len()
        );
        self.faces = faces;
        self.edges = edges;
    }

    /// Nodes of the mesh.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Mutable access to the nodes.
    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    /// Elements of the mesh.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Mutable access to the elements.
    pub fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Faces of the mesh.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Mutable access to the faces.
    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    /// Edges of the mesh.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Mutable access to the edges.
    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    /// The contour field, if one is attached.
    #[must_use]
    pub fn data(&self) -> Option<&MeshData> {
        self.data.as_ref()
    }

    /// Attaches a contour field. It must cover every element.
    pub fn set_data(&mut self, data: MeshData) -> Result<()> {
        if data.element_count() != self.elements.len() {
            return Err(FebviewError::SizeMismatch {
                expected: self.elements.len(),
                actual: data.element_count(),
            });
        }
        self.data = Some(data);
        Ok(())
    }

    /// Removes the contour field.
    pub fn clear_data(&mut self) {
        self.data = None;
    }

    /// The local positions of an element's eight reference corners, or
    /// `None` if the element is not a solid.
    #[must_use]
    pub fn element_corners(&self, element: &Element) -> Option<[DVec3; 8]> {
        let table = element.element_type.corner_table()?;
        Some(table.map(|c| self.nodes[element.nodes[c]].position))
    }

    /// Bounding box of all nodes in local coordinates.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.nodes.iter().map(|n| n.position))
    }

    /// Shows every element.
    pub fn show_all_elements(&mut self) {
        for el in &mut self.elements {
            el.visible = true;
        }
    }

    /// Derives face, node and edge visibility from element visibility.
    ///
    /// A face is visible when any neighbor is, a node when any element using
    /// it is, and an edge when both of its nodes are.
    pub fn update_item_visibility(&mut self) {
        for node in &mut self.nodes {
            node.visible = false;
        }
        for el in self.elements.iter().filter(|el| el.visible) {
            for &n in &el.nodes {
                self.nodes[n].visible = true;
            }
        }

        let elements = &self.elements;
        for face in &mut self.faces {
            face.visible = face
                .elements
                .iter()
                .flatten()
                .any(|&ei| elements[ei].visible);
        }

        let nodes = &self.nodes;
        for edge in &mut self.edges {
            edge.visible = nodes[edge.nodes[0]].visible && nodes[edge.nodes[1]].visible;
        }
    }
}
