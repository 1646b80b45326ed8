//! Selecting model items with screen regions and clicks.
//!
//! Selection runs in two passes: the model is first read to find which items
//! of the requested granularity the gesture hits, then the selection flags
//! are rewritten according to the [`SelectionMode`].

use febview_core::{
    segment_intersects_rect, BoundingBox, HitTest, IVec2, Ray, Region, ScreenRect,
    ViewTransform,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::fe_mesh::{Face, FeMesh};
use crate::model::Model;
use crate::object::Object;
use crate::pick::ray_intersect_triangle;

/// The granularity a selection gesture works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionTarget {
    /// Whole objects.
    #[default]
    Object,
    /// Parts of objects.
    Part,
    /// Geometry surfaces.
    Surface,
    /// Geometry edges.
    Edge,
    /// Geometry nodes.
    Node,
    /// Elements of the active object's mesh.
    Element,
    /// Faces of the active object's mesh.
    Face,
    /// Edges of the active object's mesh.
    FeEdge,
    /// Nodes of the active object's mesh.
    FeNode,
}

impl SelectionTarget {
    /// The target actually used: surface mode has no elements, so element
    /// selection falls back to faces.
    #[must_use]
    pub fn in_mesh_mode(self, mesh_mode: MeshMode) -> SelectionTarget {
        match (self, mesh_mode) {
            (SelectionTarget::Element, MeshMode::Surface) => SelectionTarget::Face,
            (target, _) => target,
        }
    }

    /// Returns whether the target refers to finite element mesh items.
    #[must_use]
    pub fn is_mesh_level(self) -> bool {
        matches!(
            self,
            SelectionTarget::Element
                | SelectionTarget::Face
                | SelectionTarget::FeEdge
                | SelectionTarget::FeNode
        )
    }
}

/// Which part of a finite element mesh is selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeshMode {
    /// All items, including elements and interior faces.
    #[default]
    Volume,
    /// Boundary faces and the nodes and edges on them.
    Surface,
}

/// How a gesture combines with the existing selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Hit items become the selection.
    #[default]
    Replace,
    /// Hit items are added to the selection.
    Add,
    /// Hit items are removed from the selection.
    Subtract,
}

impl SelectionMode {
    /// Applies a hit to one selection flag. Returns whether the flag changed.
    fn apply(self, flag: &mut bool, hit: bool) -> bool {
        let new = match self {
            SelectionMode::Replace => hit,
            SelectionMode::Add => *flag || hit,
            SelectionMode::Subtract => *flag && !hit,
        };
        let changed = new != *flag;
        *flag = new;
        changed
    }
}

/// Runs selection gestures against a model.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    view: &'a ViewTransform,
    target: SelectionTarget,
    mesh_mode: MeshMode,
    mode: SelectionMode,
    active: Option<usize>,
}

impl<'a> Selector<'a> {
    /// Creates a replace-mode selector for the given granularity.
    #[must_use]
    pub fn new(view: &'a ViewTransform, target: SelectionTarget) -> Self {
        Self {
            view,
            target,
            mesh_mode: MeshMode::Volume,
            mode: SelectionMode::Replace,
            active: None,
        }
    }

    /// Sets how hits combine with the existing selection.
    #[must_use]
    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the mesh mode for mesh-level targets.
    #[must_use]
    pub fn mesh_mode(mut self, mesh_mode: MeshMode) -> Self {
        self.mesh_mode = mesh_mode;
        self
    }

    /// Sets the object whose mesh mesh-level targets operate on.
    #[must_use]
    pub fn active_object(mut self, active: Option<usize>) -> Self {
        self.active = active;
        self
    }

    fn effective_target(&self) -> SelectionTarget {
        self.target.in_mesh_mode(self.mesh_mode)
    }

    /// Whether the object takes part in this selection.
    fn in_scope(&self, index: usize) -> bool {
        !self.effective_target().is_mesh_level() || self.active == Some(index)
    }

    /// Selects every item the region touches. Returns the number of items
    /// whose selection flag changed.
    pub fn region_select(&self, model: &mut Model, region: &Region) -> usize {
        let hits: Vec<Vec<bool>> = model
            .objects()
            .iter()
            .enumerate()
            .map(|(oi, object)| {
                if self.in_scope(oi) {
                    self.region_hits(object, region)
                } else {
                    Vec::new()
                }
            })
            .collect();
        let changed = self.apply(model, &hits);
        log::debug!(
            "{:?} region selection of {:?}: {changed} changed",
            region.style(),
            self.effective_target()
        );
        changed
    }

    /// Selects the item closest to the camera under the pixel `(x, y)`.
    /// Returns the number of items whose selection flag changed.
    ///
    /// In replace mode the previous selection is cleared even when nothing
    /// is hit.
    pub fn click_select(&self, model: &mut Model, x: i32, y: i32, tolerance: i32) -> usize {
        let rect = ScreenRect::around(x, y, tolerance);
        let hit = self.click_hit(model, x, y, &rect);
        let hits: Vec<Vec<bool>> = model
            .objects()
            .iter()
            .enumerate()
            .map(|(oi, object)| {
                let mut flags = vec![false; self.item_count(object)];
                if let Some((_, item)) = hit.filter(|(ho, _)| *ho == oi) {
                    if let Some(flag) = flags.get_mut(item) {
                        *flag = true;
                    }
                }
                flags
            })
            .collect();
        let changed = self.apply(model, &hits);
        log::debug!(
            "click selection of {:?} at ({x}, {y}): {:?}, {changed} changed",
            self.effective_target(),
            hit
        );
        changed
    }

    /// World-space bounding box of the items currently selected at this
    /// selector's granularity. Empty when nothing is selected.
    #[must_use]
    pub fn selection_box(&self, model: &Model) -> BoundingBox {
        let target = self.effective_target();
        let mut bbox = BoundingBox::empty();
        for (oi, object) in model.objects().iter().enumerate() {
            if !self.in_scope(oi) {
                continue;
            }
            if target == SelectionTarget::Object {
                if object.selected {
                    bbox.merge(&object.bounding_box());
                }
                continue;
            }
            for p in selected_points(object, target) {
                bbox.add_point(object.transform.local_to_global(p));
            }
        }
        bbox
    }

    fn item_count(&self, object: &Object) -> usize {
        let fe_len = |f: fn(&FeMesh) -> usize| object.fe_mesh.as_ref().map_or(0, f);
        match self.effective_target() {
            SelectionTarget::Object => 1,
            SelectionTarget::Part => object.parts.len(),
            SelectionTarget::Surface => object.surfaces.len(),
            SelectionTarget::Edge => object.edges.len(),
            SelectionTarget::Node => object.nodes.len(),
            SelectionTarget::Element => fe_len(|m| m.elements().len()),
            SelectionTarget::Face => fe_len(|m| m.faces().len()),
            SelectionTarget::FeEdge => fe_len(|m| m.edges().len()),
            SelectionTarget::FeNode => fe_len(|m| m.nodes().len()),
        }
    }

    /// Writes the hit flags onto the model.
    fn apply(&self, model: &mut Model, hits: &[Vec<bool>]) -> usize {
        let target = self.effective_target();
        let mut changed = 0;
        for (oi, object) in model.objects_mut().iter_mut().enumerate() {
            if !self.in_scope(oi) {
                continue;
            }
            let object_hits = hits.get(oi).map_or(&[][..], Vec::as_slice);
            let flags: Vec<&mut bool> = match target {
                SelectionTarget::Object => vec![&mut object.selected],
                SelectionTarget::Part => object.parts.iter_mut().map(|p| &mut p.selected).collect(),
                SelectionTarget::Surface => {
                    object.surfaces.iter_mut().map(|s| &mut s.selected).collect()
                }
                SelectionTarget::Edge => object.edges.iter_mut().map(|e| &mut e.selected).collect(),
                SelectionTarget::Node => object.nodes.iter_mut().map(|n| &mut n.selected).collect(),
                SelectionTarget::Element => match object.fe_mesh.as_mut() {
                    Some(fe) => fe.elements_mut().iter_mut().map(|e| &mut e.selected).collect(),
                    None => Vec::new(),
                },
                SelectionTarget::Face => match object.fe_mesh.as_mut() {
                    Some(fe) => fe.faces_mut().iter_mut().map(|f| &mut f.selected).collect(),
                    None => Vec::new(),
                },
                SelectionTarget::FeEdge => match object.fe_mesh.as_mut() {
                    Some(fe) => fe.edges_mut().iter_mut().map(|e| &mut e.selected).collect(),
                    None => Vec::new(),
                },
                SelectionTarget::FeNode => match object.fe_mesh.as_mut() {
                    Some(fe) => fe.nodes_mut().iter_mut().map(|n| &mut n.selected).collect(),
                    None => Vec::new(),
                },
            };
            for (i, flag) in flags.into_iter().enumerate() {
                let hit = object_hits.get(i).copied().unwrap_or(false);
                if self.mode.apply(flag, hit) {
                    changed += 1;
                }
            }
        }
        changed
    }

    fn project(&self, object: &Object, local: DVec3) -> (IVec2, f64) {
        self.view
            .world_to_pixel(object.transform.local_to_global(local))
    }

    /// Marks the nodes lying on boundary faces.
    fn exterior_nodes(fe: &FeMesh) -> Vec<bool> {
        let mut exterior = vec![false; fe.nodes().len()];
        for face in fe.faces().iter().filter(|f| f.is_exterior()) {
            for &n in &face.nodes {
                exterior[n] = true;
            }
        }
        exterior
    }

    fn face_selectable(&self, face: &Face) -> bool {
        face.visible && (self.mesh_mode == MeshMode::Volume || face.is_exterior())
    }

    fn region_hits(&self, object: &Object, region: &Region) -> Vec<bool> {
        let mut hits = vec![false; self.item_count(object)];
        if !object.visible {
            return hits;
        }

        match self.effective_target() {
            SelectionTarget::Object | SelectionTarget::Part | SelectionTarget::Surface => {
                let Some(mesh) = object.render_mesh.as_ref() else {
                    return hits;
                };
                let px: Vec<IVec2> = mesh.nodes().iter().map(|&p| self.project(object, p).0).collect();
                for face in mesh.faces() {
                    if !object.is_part_visible(face.part) {
                        continue;
                    }
                    let [a, b, c] = face.nodes.map(|n| px[n]);
                    if !region.triangle_intersects(a, b, c) {
                        continue;
                    }
                    let item = match self.effective_target() {
                        SelectionTarget::Part => face.part,
                        SelectionTarget::Surface => face.surface,
                        _ => 0,
                    };
                    if let Some(hit) = hits.get_mut(item) {
                        *hit = true;
                    }
                }
            }
            SelectionTarget::Edge => {
                let Some(mesh) = object.render_mesh.as_ref() else {
                    return hits;
                };
                for edge in mesh.edges() {
                    let Some(pid) = edge.edge else {
                        continue;
                    };
                    let (p0, _) = self.project(object, mesh.nodes()[edge.nodes[0]]);
                    let (p1, _) = self.project(object, mesh.nodes()[edge.nodes[1]]);
                    if region.line_intersects(p0.x, p0.y, p1.x, p1.y) {
                        if let Some(hit) = hits.get_mut(pid) {
                            *hit = true;
                        }
                    }
                }
            }
            SelectionTarget::Node => {
                for (ni, node) in object.nodes.iter().enumerate() {
                    let (p, _) = self.project(object, node.position);
                    hits[ni] = node.visible && region.is_inside(p.x, p.y);
                }
            }
            SelectionTarget::Element => {
                let Some(fe) = object.fe_mesh.as_ref() else {
                    return hits;
                };
                let px = self.project_nodes(object, fe);
                for (ei, el) in fe.elements().iter().enumerate() {
                    hits[ei] = el.visible
                        && object.is_part_visible(el.part)
                        && el.nodes.iter().any(|&n| region.is_inside(px[n].x, px[n].y));
                }
            }
            SelectionTarget::Face => {
                let Some(fe) = object.fe_mesh.as_ref() else {
                    return hits;
                };
                let px = self.project_nodes(object, fe);
                for (fi, face) in fe.faces().iter().enumerate() {
                    if self.face_selectable(face) {
                        let poly: Vec<IVec2> = face.nodes.iter().map(|&n| px[n]).collect();
                        hits[fi] = region.polygon_intersects(&poly);
                    }
                }
            }
            SelectionTarget::FeEdge => {
                let Some(fe) = object.fe_mesh.as_ref() else {
                    return hits;
                };
                let px = self.project_nodes(object, fe);
                for (i, edge) in fe.edges().iter().enumerate() {
                    let [p0, p1] = edge.nodes.map(|n| px[n]);
                    hits[i] = edge.visible && region.line_intersects(p0.x, p0.y, p1.x, p1.y);
                }
            }
            SelectionTarget::FeNode => {
                let Some(fe) = object.fe_mesh.as_ref() else {
                    return hits;
                };
                let exterior = Self::exterior_nodes(fe);
                let px = self.project_nodes(object, fe);
                for (ni, node) in fe.nodes().iter().enumerate() {
                    hits[ni] = node.visible
                        && (self.mesh_mode == MeshMode::Volume || exterior[ni])
                        && region.is_inside(px[ni].x, px[ni].y);
                }
            }
        }
        hits
    }

    fn project_nodes(&self, object: &Object, fe: &FeMesh) -> Vec<IVec2> {
        fe.nodes()
            .iter()
            .map(|n| self.project(object, n.position).0)
            .collect()
    }

    /// Finds the `(object, item)` under the click, nearest to the camera.
    fn click_hit(&self, model: &Model, x: i32, y: i32, rect: &ScreenRect) -> Option<(usize, usize)> {
        let ray = self.view.point_to_ray(x, y)?;
        let mut best: Option<(f64, usize, usize)> = None;
        let mut consider = |depth: f64, oi: usize, item: usize| {
            if best.map_or(true, |(bd, _, _)| depth < bd) {
                best = Some((depth, oi, item));
            }
        };

        for (oi, object) in model.objects().iter().enumerate() {
            if !object.visible || !self.in_scope(oi) {
                continue;
            }
            let t = &object.transform;
            match self.effective_target() {
                SelectionTarget::Object | SelectionTarget::Part | SelectionTarget::Surface => {
                    let Some(mesh) = object.render_mesh.as_ref() else {
                        continue;
                    };
                    for face in mesh.faces() {
                        if !object.is_part_visible(face.part) {
                            continue;
                        }
                        let [a, b, c] = face.nodes.map(|n| t.local_to_global(mesh.nodes()[n]));
                        if let Some(d) = ray_intersect_triangle(&ray, a, b, c) {
                            let item = match self.effective_target() {
                                SelectionTarget::Part => face.part,
                                SelectionTarget::Surface => face.surface,
                                _ => 0,
                            };
                            consider(d, oi, item);
                        }
                    }
                }
                SelectionTarget::Edge => {
                    let Some(mesh) = object.render_mesh.as_ref() else {
                        continue;
                    };
                    for edge in mesh.edges() {
                        let Some(pid) = edge.edge else {
                            continue;
                        };
                        let (p0, z) = self.project(object, mesh.nodes()[edge.nodes[0]]);
                        let (p1, _) = self.project(object, mesh.nodes()[edge.nodes[1]]);
                        if segment_intersects_rect(p0, p1, rect) {
                            consider(z, oi, pid);
                        }
                    }
                }
                SelectionTarget::Node => {
                    for (ni, node) in object.nodes.iter().enumerate() {
                        let (p, z) = self.project(object, node.position);
                        if node.visible && rect.contains(p) {
                            consider(z, oi, ni);
                        }
                    }
                }
                SelectionTarget::Element | SelectionTarget::Face => {
                    let Some(fe) = object.fe_mesh.as_ref() else {
                        continue;
                    };
                    if let Some((d, fi)) = self.pick_face(object, fe, &ray) {
                        let item = if self.effective_target() == SelectionTarget::Face {
                            Some(fi)
                        } else {
                            fe.faces()[fi]
                                .elements
                                .into_iter()
                                .flatten()
                                .find(|&ei| fe.elements()[ei].visible)
                        };
                        if let Some(item) = item {
                            consider(d, oi, item);
                        }
                    }
                }
                SelectionTarget::FeEdge => {
                    let Some(fe) = object.fe_mesh.as_ref() else {
                        continue;
                    };
                    for (i, edge) in fe.edges().iter().enumerate() {
                        if !edge.visible {
                            continue;
                        }
                        let (p0, z) = self.project(object, fe.nodes()[edge.nodes[0]].position);
                        let (p1, _) = self.project(object, fe.nodes()[edge.nodes[1]].position);
                        if segment_intersects_rect(p0, p1, rect) {
                            consider(z, oi, i);
                        }
                    }
                }
                SelectionTarget::FeNode => {
                    let Some(fe) = object.fe_mesh.as_ref() else {
                        continue;
                    };
                    let exterior = Self::exterior_nodes(fe);
                    for (ni, node) in fe.nodes().iter().enumerate() {
                        if !node.visible || (self.mesh_mode == MeshMode::Surface && !exterior[ni]) {
                            continue;
                        }
                        let (p, z) = self.project(object, node.position);
                        if rect.contains(p) {
                            consider(z, oi, ni);
                        }
                    }
                }
            }
        }
        best.map(|(_, oi, item)| (oi, item))
    }

    /// Nearest selectable face hit by a world-space ray.
    fn pick_face(&self, object: &Object, fe: &FeMesh, ray: &Ray) -> Option<(f64, usize)> {
        let t = &object.transform;
        let mut best: Option<(f64, usize)> = None;
        for (fi, face) in fe.faces().iter().enumerate() {
            if !self.face_selectable(face) || face.nodes.len() < 3 {
                continue;
            }
            let r: Vec<DVec3> = face
                .nodes
                .iter()
                .map(|&n| t.local_to_global(fe.nodes()[n].position))
                .collect();
            for i in 1..r.len() - 1 {
                if let Some(d) = ray_intersect_triangle(ray, r[0], r[i], r[i + 1]) {
                    if best.map_or(true, |(bd, _)| d < bd) {
                        best = Some((d, fi));
                    }
                }
            }
        }
        best
    }
}

/// Local positions of the nodes of every selected item of `target`.
fn selected_points(object: &Object, target: SelectionTarget) -> Vec<DVec3> {
    let mut points = Vec::new();
    if let Some(mesh) = object.render_mesh.as_ref() {
        let nodes = mesh.nodes();
        match target {
            SelectionTarget::Part | SelectionTarget::Surface => {
                for face in mesh.faces() {
                    let selected = if target == SelectionTarget::Part {
                        object.parts.get(face.part).is_some_and(|p| p.selected)
                    } else {
                        object.surfaces.get(face.surface).is_some_and(|s| s.selected)
                    };
                    if selected {
                        points.extend(face.nodes.iter().map(|&n| nodes[n]));
                    }
                }
            }
            SelectionTarget::Edge => {
                for edge in mesh.edges() {
                    let selected = edge
                        .edge
                        .and_then(|e| object.edges.get(e))
                        .is_some_and(|e| e.selected);
                    if selected {
                        points.extend(edge.nodes.iter().map(|&n| nodes[n]));
                    }
                }
            }
            _ => {}
        }
    }
    if target == SelectionTarget::Node {
        points.extend(object.nodes.iter().filter(|n| n.selected).map(|n| n.position));
    }

    let Some(fe) = object.fe_mesh.as_ref() else {
        return points;
    };
    let ids: Vec<usize> = match target {
        SelectionTarget::Element => fe
            .elements()
            .iter()
            .filter(|e| e.selected)
            .flat_map(|e| e.nodes.iter().copied())
            .collect(),
        SelectionTarget::Face => fe
            .faces()
            .iter()
            .filter(|f| f.selected)
            .flat_map(|f| f.nodes.iter().copied())
            .collect(),
        SelectionTarget::FeEdge => fe
            .edges()
            .iter()
            .filter(|e| e.selected)
            .flat_map(|e| e.nodes)
            .collect(),
        SelectionTarget::FeNode => (0..fe.nodes().len())
            .filter(|&i| fe.nodes()[i].selected)
            .collect(),
        _ => Vec::new(),
    };
    points.extend(ids.into_iter().map(|n| fe.nodes()[n].position));
    points
}
