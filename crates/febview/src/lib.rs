//! febview: picking, region selection and plane cuts for finite element
//! model viewers.
//!
//! The crate sits between a windowing toolkit and a renderer. The toolkit
//! forwards mouse events to a [`View`]; the view turns them into point
//! picks, highlights and selections on the attached [`Document`], and keeps
//! the plane cut current. The renderer reads the model's selection and
//! visibility flags and uploads the [`CutMesh`] returned by
//! [`View::plane_cut_mesh`].
//!
//! # Quick Start
//!
//! ```
//! use febview::*;
//!
//! let mut fe = FeMesh::new();
//! for z in [0.0, 1.0] {
//!     for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
//!         fe.add_node(DVec3::new(x, y, z));
//!     }
//! }
//! fe.add_element(ElementType::Hex8, (0..8).collect(), 0)?;
//!
//! let mut model = Model::new();
//! model.add_object(Object::from_fe_mesh("cube", fe));
//!
//! let mut view = View::new(800, 600);
//! view.set_document(Some(Document::new(model)));
//! view.set_show_plane_cut(true);
//! view.set_plane_cut([1.0, 0.0, 0.0, 0.0]);
//!
//! let cut = view.plane_cut_mesh().expect("plane cut is shown");
//! assert_eq!(cut.faces.len(), 2);
//! # Ok::<(), febview::FebviewError>(())
//! ```

mod document;
mod view;

pub use document::Document;
pub use view::{GestureResult, Modifiers, View};

// Re-export core types
pub use febview_core::{
    BoundingBox, BoxRegion, Camera, CircleRegion, ColorMap, ColorMapRegistry, FebviewError,
    FreehandRegion, Grid, HitTest, ProjectionMode, Ray, Region, RegionStyle, Result, ScreenRect,
    Transform, ViewSettings, ViewTransform, PICK_TOLERANCE,
};

// Re-export model types
pub use febview_structures::{
    CutEdge, CutFace, CutMesh, CutPlane, CutVertex, Element, ElementType, FeMesh, GeoItem,
    GeoNode, HighlightItem, HighlightKind, MeshData, MeshMode, Model, Object, Part, PlaneCutMode,
    SelectionMode, SelectionTarget,
};

pub use glam::{DQuat, DVec3, IVec2, Vec3};

/// Initializes logging through `env_logger`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::info!("febview {} logging initialized", env!("CARGO_PKG_VERSION"));
    }
}
