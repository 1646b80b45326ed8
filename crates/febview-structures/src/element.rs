//! Finite element topologies.

/// Corner extraction for hexahedra: the eight corners in reference order.
pub static HEX_CORNERS: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Corner extraction for pentahedra: the triangles fold onto collapsed quads.
pub static PENTA_CORNERS: [usize; 8] = [0, 1, 2, 2, 3, 4, 5, 5];

/// Corner extraction for tetrahedra: the top face collapses onto the apex.
pub static TET_CORNERS: [usize; 8] = [0, 1, 2, 2, 3, 3, 3, 3];

/// Corner extraction for pyramids: the top face collapses onto the apex.
pub static PYRA_CORNERS: [usize; 8] = [0, 1, 2, 3, 4, 4, 4, 4];

/// The element types a finite element mesh can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Linear hexahedron.
    Hex8,
    /// Serendipity quadratic hexahedron.
    Hex20,
    /// Lagrange quadratic hexahedron.
    Hex27,
    /// Linear pentahedron (wedge).
    Penta6,
    /// Quadratic pentahedron.
    Penta15,
    /// Linear tetrahedron.
    Tet4,
    /// Linear tetrahedron with a bubble node.
    Tet5,
    /// Quadratic tetrahedron.
    Tet10,
    /// Quadratic tetrahedron with face and bubble nodes.
    Tet15,
    /// Cubic tetrahedron.
    Tet20,
    /// Linear pyramid.
    Pyra5,
    /// Quadratic pyramid.
    Pyra13,
    /// Linear quadrilateral shell.
    Quad4,
    /// Linear triangular shell.
    Tri3,
    /// Two-node beam.
    Beam2,
}

impl ElementType {
    /// Number of nodes an element of this type references.
    #[must_use]
    pub fn node_count(self) -> usize {
        match self {
            ElementType::Hex8 => 8,
            ElementType::Hex20 | ElementType::Tet20 => 20,
            ElementType::Hex27 => 27,
            ElementType::Penta6 => 6,
            ElementType::Penta15 | ElementType::Tet15 => 15,
            ElementType::Tet4 | ElementType::Quad4 => 4,
            ElementType::Tet5 | ElementType::Pyra5 => 5,
            ElementType::Tet10 => 10,
            ElementType::Pyra13 => 13,
            ElementType::Tri3 => 3,
            ElementType::Beam2 => 2,
        }
    }

    /// Returns whether this is a volumetric element.
    #[must_use]
    pub fn is_solid(self) -> bool {
        self.corner_table().is_some()
    }

    /// The table folding this element's corners onto the eight hexahedral
    /// reference corners, or `None` for shells and beams.
    #[must_use]
    pub fn corner_table(self) -> Option<&'static [usize; 8]> {
        match self {
            ElementType::Hex8 | ElementType::Hex20 | ElementType::Hex27 => Some(&HEX_CORNERS),
            ElementType::Penta6 | ElementType::Penta15 => Some(&PENTA_CORNERS),
            ElementType::Tet4
            | ElementType::Tet5
            | ElementType::Tet10
            | ElementType::Tet15
            | ElementType::Tet20 => Some(&TET_CORNERS),
            ElementType::Pyra5 | ElementType::Pyra13 => Some(&PYRA_CORNERS),
            ElementType::Quad4 | ElementType::Tri3 | ElementType::Beam2 => None,
        }
    }

    /// Faces of the element as lists of local corner indices, outward facing.
    #[must_use]
    pub fn faces(self) -> &'static [&'static [usize]] {
        match self {
            ElementType::Hex8 | ElementType::Hex20 | ElementType::Hex27 => &[
                &[0, 1, 5, 4],
                &[1, 2, 6, 5],
                &[2, 3, 7, 6],
                &[3, 0, 4, 7],
                &[3, 2, 1, 0],
                &[4, 5, 6, 7],
            ],
            ElementType::Penta6 | ElementType::Penta15 => &[
                &[0, 1, 4, 3],
                &[1, 2, 5, 4],
                &[2, 0, 3, 5],
                &[2, 1, 0],
                &[3, 4, 5],
            ],
            ElementType::Tet4
            | ElementType::Tet5
            | ElementType::Tet10
            | ElementType::Tet15
            | ElementType::Tet20 => &[&[0, 1, 3], &[1, 2, 3], &[2, 0, 3], &[2, 1, 0]],
            ElementType::Pyra5 | ElementType::Pyra13 => &[
                &[0, 1, 4],
                &[1, 2, 4],
                &[2, 3, 4],
                &[3, 0, 4],
                &[3, 2, 1, 0],
            ],
            ElementType::Quad4 => &[&[0, 1, 2, 3]],
            ElementType::Tri3 => &[&[0, 1, 2]],
            ElementType::Beam2 => &[],
        }
    }

    /// Short display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Hex8 => "HEX8",
            ElementType::Hex20 => "HEX20",
            ElementType::Hex27 => "HEX27",
            ElementType::Penta6 => "PENTA6",
            ElementType::Penta15 => "PENTA15",
            ElementType::Tet4 => "TET4",
            ElementType::Tet5 => "TET5",
            ElementType::Tet10 => "TET10",
            ElementType::Tet15 => "TET15",
            ElementType::Tet20 => "TET20",
            ElementType::Pyra5 => "PYRA5",
            ElementType::Pyra13 => "PYRA13",
            ElementType::Quad4 => "QUAD4",
            ElementType::Tri3 => "TRI3",
            ElementType::Beam2 => "BEAM2",
        }
    }
}

/// An element of a finite element mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Topology.
    pub element_type: ElementType,
    /// Node indices into the owning mesh.
    pub nodes: Vec<usize>,
    /// Index of the part this element belongs to.
    pub part: usize,
    /// Whether the element is shown.
    pub visible: bool,
    /// Whether the element is selected.
    pub selected: bool,
}

impl Element {
    /// Returns whether this is a volumetric element.
    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.element_type.is_solid()
    }

    /// Number of geometric corners (vertex nodes) of the element.
    #[must_use]
    pub fn corner_count(&self) -> usize {
        match self.element_type {
            ElementType::Hex8 | ElementType::Hex20 | ElementType::Hex27 => 8,
            ElementType::Penta6 | ElementType::Penta15 => 6,
            ElementType::Pyra5 | ElementType::Pyra13 => 5,
            ElementType::Tet4
            | ElementType::Tet5
            | ElementType::Tet10
            | ElementType::Tet15
            | ElementType::Tet20
            | ElementType::Quad4 => 4,
            ElementType::Tri3 => 3,
            ElementType::Beam2 => 2,
        }
    }
}
