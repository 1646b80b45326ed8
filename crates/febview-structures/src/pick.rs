//! Ray picking and nearest-entity highlight queries.

use febview_core::{segment_intersects_rect, Ray, ScreenRect, ViewTransform};
use glam::DVec3;

use crate::fe_mesh::{Face, FeMesh};
use crate::model::Model;
use crate::object::Object;

/// What kind of item a highlight refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    /// A geometry edge.
    Edge,
    /// A geometry node.
    Node,
}

/// The item under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightItem {
    /// Index of the owning object.
    pub object: usize,
    /// Item kind.
    pub kind: HighlightKind,
    /// Index of the geometry edge or node within the object.
    pub index: usize,
}

/// Intersects a ray with a triangle, returning the ray parameter of the hit.
///
/// Hits at or behind the origin are ignored.
#[must_use]
pub fn ray_intersect_triangle(ray: &Ray, v0: DVec3, v1: DVec3, v2: DVec3) -> Option<f64> {
    let eps = 1e-12;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < eps {
        return None;
    }
    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * edge2.dot(q);
    (t > eps).then_some(t)
}

/// Finds the nearest point where a ray in the mesh's local frame hits a
/// visible face.
///
/// With `snap_to_node` set, the hit moves to the closest node of the face
/// that was hit.
#[must_use]
pub fn intersect_mesh(mesh: &FeMesh, ray: &Ray, snap_to_node: bool) -> Option<DVec3> {
    nearest_face_hit(mesh, ray, snap_to_node, |_| true)
}

/// Finds the nearest point where a world-space ray hits the object's mesh.
///
/// Hidden objects are never hit, and faces count only while one of their
/// elements belongs to a visible part. The result is in world coordinates.
#[must_use]
pub fn intersect_object(object: &Object, ray: &Ray, snap_to_node: bool) -> Option<DVec3> {
    if !object.visible {
        return None;
    }
    let mesh = object.fe_mesh.as_ref()?;
    let local = object.transform.global_to_local_ray(ray);
    let elements = mesh.elements();
    let in_shown_part = |face: &Face| {
        face.elements
            .iter()
            .flatten()
            .any(|&e| elements.get(e).is_some_and(|el| object.is_part_visible(el.part)))
    };
    nearest_face_hit(mesh, &local, snap_to_node, in_shown_part)
        .map(|q| object.transform.local_to_global(q))
}

fn nearest_face_hit(
    mesh: &FeMesh,
    ray: &Ray,
    snap_to_node: bool,
    accept: impl Fn(&Face) -> bool,
) -> Option<DVec3> {
    if ray.is_degenerate() {
        return None;
    }
    let nodes = mesh.nodes();
    let mut best: Option<(f64, usize)> = None;

    for (fi, face) in mesh.faces().iter().enumerate() {
        if !face.visible || face.nodes.len() < 3 || !accept(face) {
            continue;
        }
        let r0 = nodes[face.nodes[0]].position;
        for i in 1..face.nodes.len() - 1 {
            let r1 = nodes[face.nodes[i]].position;
            let r2 = nodes[face.nodes[i + 1]].position;
            if let Some(t) = ray_intersect_triangle(ray, r0, r1, r2) {
                if best.map_or(true, |(bt, _)| t < bt) {
                    best = Some((t, fi));
                }
            }
        }
    }

    let (t, fi) = best?;
    let hit = ray.at(t);
    if !snap_to_node {
        return Some(hit);
    }
    mesh.faces()[fi]
        .nodes
        .iter()
        .map(|&n| nodes[n].position)
        .min_by(|a, b| a.distance_squared(hit).total_cmp(&b.distance_squared(hit)))
}

/// Finds the visible geometry edge whose projection crosses `rect`,
/// preferring the one closest to the camera.
#[must_use]
pub fn closest_edge(model: &Model, view: &ViewTransform, rect: &ScreenRect) -> Option<HighlightItem> {
    if model.edge_count() == 0 {
        return None;
    }

    let mut best: Option<(f64, HighlightItem)> = None;
    for (oi, object) in model.objects().iter().enumerate() {
        if !object.visible {
            continue;
        }
        let Some(mesh) = object.render_mesh.as_ref() else {
            continue;
        };
        for edge in mesh.edges() {
            let Some(pid) = edge.edge else {
                continue;
            };
            let r0 = object.transform.local_to_global(mesh.nodes()[edge.nodes[0]]);
            let r1 = object.transform.local_to_global(mesh.nodes()[edge.nodes[1]]);
            let (p0, z) = view.world_to_pixel(r0);
            let (p1, _) = view.world_to_pixel(r1);
            if segment_intersects_rect(p0, p1, rect) && best.map_or(true, |(bz, _)| z < bz) {
                best = Some((
                    z,
                    HighlightItem {
                        object: oi,
                        kind: HighlightKind::Edge,
                        index: pid,
                    },
                ));
            }
        }
    }
    best.map(|(_, item)| item)
}

/// Finds the visible geometry node projected inside `rect`, preferring the
/// one closest to the camera.
#[must_use]
pub fn closest_node(model: &Model, view: &ViewTransform, rect: &ScreenRect) -> Option<HighlightItem> {
    if model.node_count() == 0 {
        return None;
    }

    let mut best: Option<(f64, HighlightItem)> = None;
    for (oi, object) in model.objects().iter().enumerate() {
        if !object.visible {
            continue;
        }
        for (ni, node) in object.nodes.iter().enumerate() {
            if !node.visible {
                continue;
            }
            let (p, z) = view.world_to_pixel(object.transform.local_to_global(node.position));
            if rect.contains(p) && best.map_or(true, |(bz, _)| z < bz) {
                best = Some((
                    z,
                    HighlightItem {
                        object: oi,
                        kind: HighlightKind::Node,
                        index: ni,
                    },
                ));
            }
        }
    }
    best.map(|(_, item)| item)
}
