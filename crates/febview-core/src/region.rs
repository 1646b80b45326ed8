//! Screen-space selection regions.
//!
//! A region is built from one mouse gesture, used to hit-test the projected
//! model once, and then dropped. Three shapes exist:
//! - [`BoxRegion`] - rubber-band rectangle
//! - [`CircleRegion`] - circle centered on the press point
//! - [`FreehandRegion`] - closed lasso polygon
//!
//! All queries are total: degenerate regions answer "not inside" and
//! "no intersection" instead of failing.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::screen::{segment_intersects_rect, ScreenRect};

/// Hit-testing capability shared by all region shapes.
pub trait HitTest {
    /// Returns whether the screen point lies inside the region.
    fn is_inside(&self, x: i32, y: i32) -> bool;

    /// Returns whether the segment touches the region.
    ///
    /// The default only checks the endpoints.
    fn line_intersects(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        self.is_inside(x0, y0) || self.is_inside(x1, y1)
    }

    /// Returns whether any edge of the triangle touches the region.
    fn triangle_intersects(&self, a: IVec2, b: IVec2, c: IVec2) -> bool {
        self.line_intersects(a.x, a.y, b.x, b.y)
            || self.line_intersects(b.x, b.y, c.x, c.y)
            || self.line_intersects(c.x, c.y, a.x, a.y)
    }

    /// Returns whether any edge of the closed polygon touches the region.
    fn polygon_intersects(&self, points: &[IVec2]) -> bool {
        match points {
            [] => false,
            [p] => self.is_inside(p.x, p.y),
            _ => (0..points.len()).any(|i| {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                self.line_intersects(a.x, a.y, b.x, b.y)
            }),
        }
    }
}

/// Which region shape a drag gesture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionStyle {
    /// Rubber-band rectangle.
    #[default]
    Box,
    /// Circle centered on the press point.
    Circle,
    /// Freehand lasso.
    Freehand,
}

/// An axis-aligned rectangular region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRegion {
    rect: ScreenRect,
}

impl BoxRegion {
    /// Creates a box from the press point `(x0, y0)` and release point `(x1, y1)`.
    #[must_use]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            rect: ScreenRect::from_corners(IVec2::new(x0, y0), IVec2::new(x1, y1)),
        }
    }

    /// The normalized rectangle.
    #[must_use]
    pub fn rect(&self) -> ScreenRect {
        self.rect
    }
}

impl HitTest for BoxRegion {
    fn is_inside(&self, x: i32, y: i32) -> bool {
        self.rect.contains(IVec2::new(x, y))
    }

    fn line_intersects(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        segment_intersects_rect(IVec2::new(x0, y0), IVec2::new(x1, y1), &self.rect)
    }
}

/// A circular region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleRegion {
    center: IVec2,
    radius: i32,
}

impl CircleRegion {
    /// Creates a circle centered at `(x0, y0)` passing through `(x1, y1)`.
    ///
    /// The radius is truncated to whole pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let dx = f64::from(x1 - x0);
        let dy = f64::from(y1 - y0);
        Self {
            center: IVec2::new(x0, y0),
            radius: (dx * dx + dy * dy).sqrt() as i32,
        }
    }

    /// Center of the circle.
    #[must_use]
    pub fn center(&self) -> IVec2 {
        self.center
    }

    /// Radius in pixels.
    #[must_use]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    fn radius_squared(&self) -> i64 {
        i64::from(self.radius) * i64::from(self.radius)
    }
}

impl HitTest for CircleRegion {
    fn is_inside(&self, x: i32, y: i32) -> bool {
        let rx = i64::from(x - self.center.x);
        let ry = i64::from(y - self.center.y);
        rx * rx + ry * ry <= self.radius_squared()
    }

    fn line_intersects(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        if self.is_inside(x0, y0) || self.is_inside(x1, y1) {
            return true;
        }

        let tx = i64::from(x1 - x0);
        let ty = i64::from(y1 - y0);
        let n = tx * tx + ty * ty;
        if n == 0 {
            return false;
        }

        // projection of the center onto the segment, as the fraction d / n
        let d = tx * i64::from(self.center.x - x0) + ty * i64::from(self.center.y - y0);
        if d < 0 || d > n {
            return false;
        }

        let px = i64::from(x0) + d * tx / n - i64::from(self.center.x);
        let py = i64::from(y0) + d * ty / n - i64::from(self.center.y);
        px * px + py * py <= self.radius_squared()
    }
}

/// A closed polygon drawn by hand. The last point connects back to the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreehandRegion {
    points: Vec<IVec2>,
    min: IVec2,
    max: IVec2,
}

impl FreehandRegion {
    /// Creates an empty lasso.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lasso from an ordered point list.
    pub fn from_points(points: impl IntoIterator<Item = IVec2>) -> Self {
        let mut region = Self::new();
        for p in points {
            region.push_point(p);
        }
        region
    }

    /// Appends a point, skipping it if it repeats the previous one.
    pub fn push_point(&mut self, p: IVec2) {
        match self.points.last() {
            None => {
                self.min = p;
                self.max = p;
            }
            Some(last) if *last == p => return,
            Some(_) => {
                self.min = self.min.min(p);
                self.max = self.max.max(p);
            }
        }
        self.points.push(p);
    }

    /// The lasso points in drawing order.
    #[must_use]
    pub fn points(&self) -> &[IVec2] {
        &self.points
    }

    /// Returns whether the lasso has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding rectangle of the lasso, or `None` if empty.
    #[must_use]
    pub fn bounds(&self) -> Option<ScreenRect> {
        (!self.points.is_empty()).then(|| ScreenRect::from_corners(self.min, self.max))
    }
}

impl HitTest for FreehandRegion {
    fn is_inside(&self, x: i32, y: i32) -> bool {
        if self.points.is_empty() {
            return false;
        }
        if x < self.min.x || x > self.max.x || y < self.min.y || y > self.max.y {
            return false;
        }

        // shift the scanline off integer rows so it never passes through a vertex
        let yc = f64::from(y) + 0.0001;
        let xq = f64::from(x);
        let n = self.points.len();
        let mut crossings = 0;
        for i in 0..n {
            let a = self.points[i].as_dvec2();
            let b = self.points[(i + 1) % n].as_dvec2();
            if (b.y > yc && a.y < yc) || (a.y > yc && b.y < yc) {
                let xi = b.x + ((a.x - b.x) * (b.y - yc)) / (b.y - a.y);
                if xi > xq {
                    crossings += 1;
                }
            }
        }
        crossings % 2 == 1
    }
}

/// A selection region of any shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// Rectangle.
    Box(BoxRegion),
    /// Circle.
    Circle(CircleRegion),
    /// Freehand lasso.
    Freehand(FreehandRegion),
}

impl Region {
    /// Builds the region for a drag gesture.
    ///
    /// `press` and `release` define boxes and circles; `path` is the lasso
    /// for freehand regions.
    #[must_use]
    pub fn from_gesture(style: RegionStyle, press: IVec2, release: IVec2, path: &[IVec2]) -> Self {
        match style {
            RegionStyle::Box => Region::Box(BoxRegion::new(press.x, press.y, release.x, release.y)),
            RegionStyle::Circle => {
                Region::Circle(CircleRegion::new(press.x, press.y, release.x, release.y))
            }
            RegionStyle::Freehand => {
                Region::Freehand(FreehandRegion::from_points(path.iter().copied()))
            }
        }
    }

    /// The style this region was built with.
    #[must_use]
    pub fn style(&self) -> RegionStyle {
        match self {
            Region::Box(_) => RegionStyle::Box,
            Region::Circle(_) => RegionStyle::Circle,
            Region::Freehand(_) => RegionStyle::Freehand,
        }
    }
}

impl HitTest for Region {
    fn is_inside(&self, x: i32, y: i32) -> bool {
        match self {
            Region::Box(r) => r.is_inside(x, y),
            Region::Circle(r) => r.is_inside(x, y),
            Region::Freehand(r) => r.is_inside(x, y),
        }
    }

    fn line_intersects(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
        match self {
            Region::Box(r) => r.line_intersects(x0, y0, x1, y1),
            Region::Circle(r) => r.line_intersects(x0, y0, x1, y1),
            Region::Freehand(r) => r.line_intersects(x0, y0, x1, y1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square_lasso() -> FreehandRegion {
        FreehandRegion::from_points([
            IVec2::new(10, 10),
            IVec2::new(50, 10),
            IVec2::new(50, 40),
            IVec2::new(10, 40),
        ])
    }

    #[test]
    fn test_box_normalizes_corners() {
        let r = BoxRegion::new(50, 40, 10, 10);
        assert!(r.is_inside(10, 10));
        assert!(r.is_inside(50, 40));
        assert!(r.is_inside(30, 20));
        assert!(!r.is_inside(51, 20));
    }

    #[test]
    fn test_box_line_intersects() {
        let r = BoxRegion::new(0, 0, 10, 10);
        assert!(r.line_intersects(-5, 5, 15, 5));
        assert!(!r.line_intersects(-5, 20, 15, 20));
    }

    #[test]
    fn test_zero_size_box() {
        let r = BoxRegion::new(5, 5, 5, 5);
        assert!(r.is_inside(5, 5));
        assert!(!r.is_inside(6, 5));
        assert!(!r.line_intersects(0, 0, 10, 10));
    }

    #[test]
    fn test_circle_radius_truncated() {
        let c = CircleRegion::new(0, 0, 3, 3);
        // sqrt(18) = 4.24
        assert_eq!(c.radius(), 4);
        assert!(c.is_inside(0, 0));
        assert!(c.is_inside(4, 0));
        assert!(!c.is_inside(5, 0));
        assert!(!c.is_inside(3, 3));
    }

    #[test]
    fn test_circle_boundary() {
        let c = CircleRegion::new(100, 100, 110, 100);
        assert_eq!(c.radius(), 10);
        assert!(c.is_inside(100, 100));
        assert!(c.is_inside(109, 100));
        assert!(c.is_inside(110, 100));
        assert!(!c.is_inside(111, 100));
    }

    #[test]
    fn test_circle_line_through_center() {
        let c = CircleRegion::new(0, 0, 5, 0);
        assert!(c.line_intersects(-20, 1, 20, 1));
        assert!(!c.line_intersects(-20, 8, 20, 8));
        // closest point beyond the segment end
        assert!(!c.line_intersects(10, 0, 20, 0));
        // zero-length segment outside
        assert!(!c.line_intersects(10, 10, 10, 10));
    }

    #[test]
    fn test_freehand_square() {
        let lasso = square_lasso();
        assert!(lasso.is_inside(30, 25));
        assert!(!lasso.is_inside(5, 25));
        assert!(!lasso.is_inside(30, 45));
        assert_eq!(
            lasso.bounds(),
            Some(ScreenRect::from_corners(IVec2::new(10, 10), IVec2::new(50, 40)))
        );
    }

    #[test]
    fn test_freehand_concave() {
        // U shape: the notch between the arms is outside
        let lasso = FreehandRegion::from_points([
            IVec2::new(0, 0),
            IVec2::new(10, 0),
            IVec2::new(10, 30),
            IVec2::new(20, 30),
            IVec2::new(20, 0),
            IVec2::new(30, 0),
            IVec2::new(30, 40),
            IVec2::new(0, 40),
        ]);
        assert!(lasso.is_inside(5, 10));
        assert!(lasso.is_inside(25, 10));
        assert!(!lasso.is_inside(15, 10));
        assert!(lasso.is_inside(15, 35));
    }

    #[test]
    fn test_freehand_skips_repeated_points() {
        let mut lasso = FreehandRegion::new();
        lasso.push_point(IVec2::new(1, 1));
        lasso.push_point(IVec2::new(1, 1));
        lasso.push_point(IVec2::new(2, 3));
        assert_eq!(lasso.points().len(), 2);
    }

    #[test]
    fn test_empty_freehand() {
        let lasso = FreehandRegion::new();
        assert!(lasso.is_empty());
        assert!(lasso.bounds().is_none());
        assert!(!lasso.is_inside(0, 0));
        assert!(!lasso.line_intersects(-10, -10, 10, 10));
        assert!(!lasso.triangle_intersects(
            IVec2::new(0, 0),
            IVec2::new(5, 0),
            IVec2::new(0, 5)
        ));
    }

    #[test]
    fn test_triangle_intersects_any_edge() {
        let r = BoxRegion::new(0, 0, 10, 10);
        // one edge passes through, all vertices outside
        assert!(r.triangle_intersects(
            IVec2::new(-10, 5),
            IVec2::new(20, 5),
            IVec2::new(5, 40)
        ));
        assert!(!r.triangle_intersects(
            IVec2::new(20, 20),
            IVec2::new(30, 20),
            IVec2::new(25, 30)
        ));
    }

    #[test]
    fn test_polygon_intersects_closing_edge() {
        let r = BoxRegion::new(0, 0, 10, 10);
        // only the closing edge (last -> first) crosses the box
        let quad = [
            IVec2::new(-10, 5),
            IVec2::new(-10, 50),
            IVec2::new(20, 50),
            IVec2::new(20, 5),
        ];
        assert!(r.polygon_intersects(&quad));
        assert!(!r.polygon_intersects(&[]));
    }

    #[test]
    fn test_region_dispatch() {
        let press = IVec2::new(0, 0);
        let release = IVec2::new(10, 10);
        let region = Region::from_gesture(RegionStyle::Circle, press, release, &[]);
        assert_eq!(region.style(), RegionStyle::Circle);
        assert!(region.is_inside(10, 0));
        let region = Region::from_gesture(RegionStyle::Box, press, release, &[]);
        assert!(!region.is_inside(11, 0));
        let region = Region::from_gesture(RegionStyle::Freehand, press, release, &[]);
        assert!(!region.is_inside(5, 5));
    }

    proptest! {
        #[test]
        fn prop_lasso_rectangle_matches_box(
            x0 in -100i32..100, y0 in -100i32..100,
            w in 1i32..60, h in 1i32..60,
            px in -200i32..200, py in -200i32..200,
        ) {
            let (x1, y1) = (x0 + w, y0 + h);
            let lasso = FreehandRegion::from_points([
                IVec2::new(x0, y0),
                IVec2::new(x1, y0),
                IVec2::new(x1, y1),
                IVec2::new(x0, y1),
            ]);
            let bx = BoxRegion::new(x0, y0, x1, y1);
            // strictly inside and strictly outside agree; the border rows differ
            // only through the scanline offset
            let strictly_inside = px > x0 && px < x1 && py >= y0 && py < y1;
            let outside = px < x0 || px > x1 || py < y0 || py > y1;
            if strictly_inside || outside {
                prop_assert_eq!(lasso.is_inside(px, py), bx.is_inside(px, py));
            }
        }

        #[test]
        fn prop_circle_center_inside(
            cx in -500i32..500, cy in -500i32..500,
            dx in -100i32..100, dy in -100i32..100,
        ) {
            let c = CircleRegion::new(cx, cy, cx + dx, cy + dy);
            prop_assert!(c.is_inside(cx, cy));
            prop_assert!(!c.is_inside(cx + c.radius() + 1, cy));
        }
    }
}
