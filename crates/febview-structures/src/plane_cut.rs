//! Slicing finite element meshes with a plane.
//!
//! Every visible solid element is folded onto the eight corners of the
//! hexahedral reference cell, its corners are classified against the plane,
//! and the matching entry of [`CASE_TABLE`](crate::case_table::CASE_TABLE)
//! gives the triangles of the cross-section. Vertices are interpolated along
//! the reference edges, colors with them.
//!
//! The coarser alternative, [`hide_outside_elements`], only hides elements
//! that reach outside the half-space.

use febview_core::{BoundingBox, ColorMap, ViewSettings};
use glam::{DVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::case_table::{case_triangles, HEX_EDGES};
use crate::cut_mesh::{CutEdge, CutFace, CutMesh, Rgba};
use crate::model::Model;
use crate::object::Object;

/// Scale applied to the plane offset when classifying corners.
///
/// Keeps corners that lie on the plane up to rounding from flipping sides.
pub const CASE_EPSILON_FACTOR: f64 = 0.999_999;

/// How an active plane cut is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaneCutMode {
    /// Build a cross-section surface.
    #[default]
    PlaneCut,
    /// Hide every element that reaches outside the half-space.
    HideElements,
}

/// The half-space `normal · x >= offset`.
///
/// The normal need not be unit length; every comparison uses it as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutPlane {
    /// Plane normal, pointing into the kept half-space.
    pub normal: DVec3,
    /// Plane offset along the normal.
    pub offset: f64,
}

impl Default for CutPlane {
    fn default() -> Self {
        Self::new(DVec3::X, 0.0)
    }
}

impl CutPlane {
    /// Creates a plane from a normal and offset.
    #[must_use]
    pub fn new(normal: DVec3, offset: f64) -> Self {
        Self { normal, offset }
    }

    /// Creates a plane from the equation `a x + b y + c z + e = 0`.
    #[must_use]
    pub fn from_coefficients(c: [f64; 4]) -> Self {
        Self::new(DVec3::new(c[0], c[1], c[2]), -c[3])
    }

    /// The plane equation coefficients `[a, b, c, e]`.
    #[must_use]
    pub fn coefficients(&self) -> [f64; 4] {
        [self.normal.x, self.normal.y, self.normal.z, -self.offset]
    }

    /// Creates a plane whose offset is given relative to a bounding box.
    ///
    /// `t = -1` puts the plane on the box corner with the smallest projection
    /// onto `normal`, `t = 1` on the corner with the largest.
    #[must_use]
    pub fn from_normalized(normal: DVec3, t: f64, bbox: &BoundingBox) -> Self {
        if !bbox.is_valid() {
            return Self::new(normal, 0.0);
        }
        let (d0, d1) = bbox
            .corners()
            .iter()
            .map(|c| normal.dot(*c))
            .fold((f64::MAX, f64::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Self::new(normal, d0 + 0.5 * (t + 1.0) * (d1 - d0))
    }

    /// Returns whether the normal is too short to define a plane.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal.length_squared() < 1e-24
    }

    /// The plane functional `normal · p`.
    #[must_use]
    pub fn value(&self, p: DVec3) -> f64 {
        self.normal.dot(p)
    }

    /// Whether a corner counts as inside for case classification.
    #[must_use]
    pub fn classifies_inside(&self, p: DVec3) -> bool {
        self.value(p) > self.offset * CASE_EPSILON_FACTOR
    }
}

/// The 8-bit case code of a reference cell: bit `k` is set when corner `k`
/// is inside.
#[must_use]
pub fn case_code(corners: &[DVec3; 8], plane: &CutPlane) -> u8 {
    corners
        .iter()
        .enumerate()
        .filter(|(_, c)| plane.classifies_inside(**c))
        .fold(0u8, |code, (k, _)| code | (1 << k))
}

/// Converts a color in `[0, 1]` to bytes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_rgba(c: Vec3) -> Rgba {
    let c = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

/// Interpolates two colors channel by channel, truncating to bytes.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_rgba(a: Rgba, b: Rgba, w: f64) -> Rgba {
    std::array::from_fn(|i| {
        let (ca, cb) = (f64::from(a[i]), f64::from(b[i]));
        (ca + w * (cb - ca)) as u8
    })
}

/// Builds the cross-section of a model.
#[derive(Debug, Clone)]
pub struct PlaneCutBuilder<'a> {
    plane: CutPlane,
    active: Option<usize>,
    contour: Option<&'a ColorMap>,
    default_color: Vec3,
    unassigned_color: Vec3,
    selection_color: Vec3,
}

/// A cut vertex together with the reference edge it lies on.
#[derive(Clone, Copy)]
struct CutPoint {
    edge: usize,
    position: DVec3,
    color: Rgba,
}

impl<'a> PlaneCutBuilder<'a> {
    /// Creates a builder with default colors and no contour.
    #[must_use]
    pub fn new(plane: CutPlane) -> Self {
        let settings = ViewSettings::default();
        Self {
            plane,
            active: None,
            contour: None,
            default_color: settings.default_color,
            unassigned_color: settings.unassigned_data_color,
            selection_color: settings.selection_color,
        }
    }

    /// Takes the colors from the view settings.
    #[must_use]
    pub fn with_settings(mut self, settings: &ViewSettings) -> Self {
        self.default_color = settings.default_color;
        self.unassigned_color = settings.unassigned_data_color;
        self.selection_color = settings.selection_color;
        self
    }

    /// Sets the active object. Only it is painted with contour data.
    #[must_use]
    pub fn active_object(mut self, active: Option<usize>) -> Self {
        self.active = active;
        self
    }

    /// Paints the active object's contour field through `color_map`.
    #[must_use]
    pub fn contour(mut self, color_map: Option<&'a ColorMap>) -> Self {
        self.contour = color_map;
        self
    }

    /// Builds the cut mesh. Degenerate planes and empty models give an
    /// empty mesh.
    #[must_use]
    pub fn build(&self, model: &Model) -> CutMesh {
        let mut mesh = CutMesh::new();
        if self.plane.is_degenerate() {
            log::debug!("plane cut skipped: degenerate plane normal");
            return mesh;
        }

        for (oi, object) in model.objects().iter().enumerate() {
            if object.visible && object.fe_mesh.is_some() {
                self.cut_object(model, oi, object, &mut mesh);
            }
        }

        mesh.finalize();
        log::debug!(
            "plane cut built: {} faces, {} edges",
            mesh.faces.len(),
            mesh.edges.len()
        );
        mesh
    }

    /// The contour map with its range stretched over the object's data, if
    /// the object should be painted with contours.
    fn object_contour(&self, index: usize, object: &Object) -> Option<ColorMap> {
        if self.active != Some(index) {
            return None;
        }
        let map = self.contour?;
        let (lo, hi) = object.fe_mesh.as_ref()?.data()?.value_range()?;
        let mut map = map.clone();
        map.set_range(lo, hi);
        Some(map)
    }

    fn cut_object(&self, model: &Model, oi: usize, object: &Object, mesh: &mut CutMesh) {
        let Some(fe) = object.fe_mesh.as_ref() else {
            return;
        };
        let contour = self.object_contour(oi, object);
        let data = fe.data();
        let plane = &self.plane;

        // per-element outline candidates: reference edge pair and multiplicity
        let mut outline: Vec<([usize; 2], u32, [DVec3; 2])> = Vec::with_capacity(16);

        for (ei, el) in fe.elements().iter().enumerate() {
            if !el.visible || !object.is_part_visible(el.part) {
                continue;
            }
            let Some(table) = el.element_type.corner_table() else {
                continue;
            };

            let ex = table.map(|c| {
                object
                    .transform
                    .local_to_global(fe.nodes()[el.nodes[c]].position)
            });
            let case = case_code(&ex, plane);
            if case == 0 || case == 255 {
                continue;
            }

            let ec: [Rgba; 8] = match (&contour, data) {
                (Some(map), Some(data)) if data.tag(ei) > 0 => {
                    table.map(|c| to_rgba(map.map(data.element_value(ei, c))))
                }
                (Some(_), _) => [to_rgba(self.unassigned_color); 8],
                (None, _) => {
                    let color = if el.selected {
                        self.selection_color
                    } else {
                        object
                            .parts
                            .get(el.part)
                            .and_then(|p| model.material_color(p.material))
                            .unwrap_or(self.default_color)
                    };
                    [to_rgba(color); 8]
                }
            };

            outline.clear();
            for tri in case_triangles(case) {
                let v = tri.map(|edge| {
                    let [a, b] = HEX_EDGES[edge];
                    let (w1, w2) = (plane.value(ex[a]), plane.value(ex[b]));
                    let dw = w2 - w1;
                    let w = if dw == 0.0 { 0.0 } else { (plane.offset - w1) / dw };
                    CutPoint {
                        edge,
                        position: ex[a] + (ex[b] - ex[a]) * w,
                        color: lerp_rgba(ec[a], ec[b], w),
                    }
                });

                // collapsed corners of non-hex elements give zero-area triangles
                if v[0].position == v[1].position
                    || v[1].position == v[2].position
                    || v[2].position == v[0].position
                {
                    continue;
                }

                mesh.faces.push(CutFace {
                    positions: v.map(|r| r.position),
                    colors: v.map(|r| r.color),
                    normal: DVec3::ZERO,
                    object: oi,
                    element: ei,
                    selected: el.selected,
                });

                for (p, q) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
                    let key = [p.edge.min(q.edge), p.edge.max(q.edge)];
                    match outline.iter_mut().find(|(k, _, _)| *k == key) {
                        Some((_, count, _)) => *count += 1,
                        None => outline.push((key, 1, [p.position, q.position])),
                    }
                }
            }

            mesh.edges.extend(
                outline
                    .iter()
                    .filter(|(_, count, _)| *count == 1)
                    .map(|(_, _, positions)| CutEdge {
                        positions: *positions,
                        selected: el.selected,
                    }),
            );
        }
    }
}

/// Hides every element with a node strictly outside the plane.
///
/// Node tags are set to `1` for outside nodes and `0` otherwise, then face,
/// node and edge visibility is rederived.
pub fn hide_outside_elements(model: &mut Model, plane: &CutPlane) {
    let mut hidden = 0usize;
    for object in model.objects_mut() {
        let transform = object.transform;
        let Some(fe) = object.fe_mesh.as_mut() else {
            continue;
        };

        for node in fe.nodes_mut() {
            let outside = plane.value(transform.local_to_global(node.position)) < plane.offset;
            node.tag = i32::from(outside);
        }

        let tags: Vec<i32> = fe.nodes().iter().map(|n| n.tag).collect();
        for el in fe.elements_mut() {
            el.visible = !el.nodes.iter().any(|&n| tags[n] == 1);
            if !el.visible {
                hidden += 1;
            }
        }
        fe.update_item_visibility();
    }
    log::debug!("plane cut hid {hidden} elements");
}

/// Shows every element of every mesh again.
pub fn show_all_elements(model: &mut Model) {
    for fe in model
        .objects_mut()
        .iter_mut()
        .filter_map(|o| o.fe_mesh.as_mut())
    {
        fe.show_all_elements();
        fe.update_item_visibility();
    }
}
