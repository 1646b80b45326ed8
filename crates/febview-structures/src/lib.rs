//! Model structures for febview.
//!
//! This crate holds the model and the algorithms that run on it:
//! - finite element meshes with their element types and per-element data
//! - objects, parts and the [`Model`] that owns them
//! - plane cuts through solid elements ([`PlaneCutBuilder`])
//! - ray picking and nearest-entity highlight queries
//! - region and click selection ([`Selector`])

// Mesh code intentionally uses casts for indices and colors
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]

pub mod case_table;
pub mod cut_mesh;
pub mod element;
pub mod fe_mesh;
pub mod mesh_data;
pub mod model;
pub mod object;
pub mod pick;
pub mod plane_cut;
pub mod render_mesh;
pub mod select;

pub use cut_mesh::{CutEdge, CutFace, CutMesh, CutVertex, Rgba};
pub use element::{Element, ElementType};
pub use fe_mesh::{Edge, Face, FeMesh, Node};
pub use mesh_data::MeshData;
pub use model::{Material, Model};
pub use object::{GeoItem, GeoNode, Object, Part};
pub use pick::{
    closest_edge, closest_node, intersect_mesh, intersect_object, ray_intersect_triangle,
    HighlightItem, HighlightKind,
};
pub use plane_cut::{
    hide_outside_elements, show_all_elements, CutPlane, PlaneCutBuilder, PlaneCutMode,
};
pub use render_mesh::{RenderEdge, RenderFace, RenderMesh};
pub use select::{MeshMode, SelectionMode, SelectionTarget, Selector};
