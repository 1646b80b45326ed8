//! Screen-space rectangles and the segment/rectangle intersection test.
//!
//! Screen coordinates are integer pixels with the origin at the top-left
//! corner of the viewport and y pointing down.

use glam::IVec2;

/// Half-size in pixels of the tolerance box used for point picks and highlights.
pub const PICK_TOLERANCE: i32 = 4;

/// An axis-aligned rectangle in screen space with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    /// Left edge.
    pub x0: i32,
    /// Top edge.
    pub y0: i32,
    /// Right edge.
    pub x1: i32,
    /// Bottom edge.
    pub y1: i32,
}

impl ScreenRect {
    /// Creates a rectangle from two corners given in any order.
    #[must_use]
    pub fn from_corners(a: IVec2, b: IVec2) -> Self {
        Self {
            x0: a.x.min(b.x),
            y0: a.y.min(b.y),
            x1: a.x.max(b.x),
            y1: a.y.max(b.y),
        }
    }

    /// Creates the square `[x - s, x + s] x [y - s, y + s]`.
    ///
    /// A negative half-size counts as zero; the bounds saturate at the
    /// `i32` range.
    #[must_use]
    pub fn around(x: i32, y: i32, s: i32) -> Self {
        let s = s.max(0);
        Self {
            x0: x.saturating_sub(s),
            y0: y.saturating_sub(s),
            x1: x.saturating_add(s),
            y1: y.saturating_add(s),
        }
    }

    /// Returns whether the point lies inside or on the border.
    #[must_use]
    pub fn contains(&self, p: IVec2) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Returns whether the rectangle has zero width or height.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Tests whether the segment `p0`-`p1` touches the rectangle.
///
/// An endpoint inside the rectangle is a hit. Otherwise horizontal and
/// vertical segments must span the rectangle at a coordinate strictly inside
/// it, and general segments must cross one of the four edges strictly within
/// that edge's extent. The endpoints are put in a canonical order first so the
/// integer arithmetic gives the same answer for `(p0, p1)` and `(p1, p0)`.
#[must_use]
pub fn segment_intersects_rect(p0: IVec2, p1: IVec2, rect: &ScreenRect) -> bool {
    if rect.contains(p0) || rect.contains(p1) {
        return true;
    }
    if rect.is_degenerate() {
        return false;
    }

    let (a, b) = if (p0.x, p0.y) <= (p1.x, p1.y) {
        (p0, p1)
    } else {
        (p1, p0)
    };

    // i64 keeps the products below safe for far off-screen projections
    let (ax, ay, bx, by) = (
        i64::from(a.x),
        i64::from(a.y),
        i64::from(b.x),
        i64::from(b.y),
    );
    let (x0, y0, x1, y1) = (
        i64::from(rect.x0),
        i64::from(rect.y0),
        i64::from(rect.x1),
        i64::from(rect.y1),
    );

    if ay == by {
        return ay > y0 && ay < y1 && spans(ax, bx, x0, x1);
    }
    if ax == bx {
        return ax > x0 && ax < x1 && spans(ay, by, y0, y1);
    }

    // top and bottom edges
    for y in [y0, y1] {
        let x = ax + ((y - ay) * (bx - ax)) / (by - ay);
        if x > x0 && x < x1 {
            return crosses(ay, by, y);
        }
    }

    // left and right edges
    for x in [x0, x1] {
        let y = ay + ((x - ax) * (by - ay)) / (bx - ax);
        if y > y0 && y < y1 {
            return crosses(ax, bx, x);
        }
    }

    false
}

/// Whether the interval between `a` and `b` covers `[lo, hi]` from outside.
fn spans(a: i64, b: i64, lo: i64, hi: i64) -> bool {
    (a < lo && b > hi) || (b < lo && a > hi)
}

/// Whether `a` and `b` lie strictly on opposite sides of `v`.
fn crosses(a: i64, b: i64, v: i64) -> bool {
    (a < v && b > v) || (b < v && a > v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rect() -> ScreenRect {
        ScreenRect::from_corners(IVec2::new(0, 0), IVec2::new(10, 10))
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let r = ScreenRect::from_corners(IVec2::new(10, 2), IVec2::new(3, 8));
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (3, 2, 10, 8));
        assert!(r.contains(IVec2::new(3, 2)));
        assert!(r.contains(IVec2::new(10, 8)));
        assert!(!r.contains(IVec2::new(11, 8)));
    }

    #[test]
    fn test_rect_around() {
        let r = ScreenRect::around(100, 50, PICK_TOLERANCE);
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (96, 46, 104, 54));

        // a negative size collapses to the point itself
        let r = ScreenRect::around(100, 50, -3);
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (100, 50, 100, 50));
        assert!(r.contains(IVec2::new(100, 50)));

        let r = ScreenRect::around(10, -10, i32::MAX);
        assert_eq!((r.x0, r.y0, r.x1, r.y1), (i32::MIN + 11, i32::MIN, i32::MAX, i32::MAX - 10));
        assert_eq!(r.width(), i32::MAX);
    }

    #[test]
    fn test_endpoint_inside() {
        assert!(segment_intersects_rect(
            IVec2::new(5, 5),
            IVec2::new(50, 50),
            &rect()
        ));
        assert!(segment_intersects_rect(
            IVec2::new(-50, 3),
            IVec2::new(0, 0),
            &rect()
        ));
    }

    #[test]
    fn test_horizontal_segment() {
        assert!(segment_intersects_rect(
            IVec2::new(-5, 5),
            IVec2::new(15, 5),
            &rect()
        ));
        // on the border row: not strictly inside
        assert!(!segment_intersects_rect(
            IVec2::new(-5, 10),
            IVec2::new(15, 10),
            &rect()
        ));
        // stops short of the rectangle
        assert!(!segment_intersects_rect(
            IVec2::new(-5, 5),
            IVec2::new(-1, 5),
            &rect()
        ));
    }

    #[test]
    fn test_vertical_segment() {
        assert!(segment_intersects_rect(
            IVec2::new(5, -5),
            IVec2::new(5, 15),
            &rect()
        ));
        assert!(!segment_intersects_rect(
            IVec2::new(20, -5),
            IVec2::new(20, 15),
            &rect()
        ));
    }

    #[test]
    fn test_diagonal_segment() {
        assert!(segment_intersects_rect(
            IVec2::new(-5, -4),
            IVec2::new(15, 14),
            &rect()
        ));
        // passes beside the rectangle
        assert!(!segment_intersects_rect(
            IVec2::new(-5, 8),
            IVec2::new(8, 25),
            &rect()
        ));
        // line would cross, segment too short
        assert!(!segment_intersects_rect(
            IVec2::new(-20, -16),
            IVec2::new(-10, -6),
            &rect()
        ));
    }

    #[test]
    fn test_degenerate_rect() {
        let flat = ScreenRect::from_corners(IVec2::new(0, 5), IVec2::new(10, 5));
        assert!(!segment_intersects_rect(
            IVec2::new(5, 0),
            IVec2::new(5, 10),
            &flat
        ));
        // endpoint on the degenerate rectangle still counts
        assert!(segment_intersects_rect(
            IVec2::new(5, 5),
            IVec2::new(5, 10),
            &flat
        ));
    }

    proptest! {
        #[test]
        fn prop_symmetric_under_swap(
            ax in -200i32..200, ay in -200i32..200,
            bx in -200i32..200, by in -200i32..200,
            cx in -100i32..100, cy in -100i32..100,
            w in 0i32..80, h in 0i32..80,
        ) {
            let r = ScreenRect::from_corners(IVec2::new(cx, cy), IVec2::new(cx + w, cy + h));
            let a = IVec2::new(ax, ay);
            let b = IVec2::new(bx, by);
            prop_assert_eq!(
                segment_intersects_rect(a, b, &r),
                segment_intersects_rect(b, a, &r)
            );
        }

        #[test]
        fn prop_segments_left_of_rect_miss(
            ax in -200i32..-1, ay in -200i32..200,
            bx in -200i32..-1, by in -200i32..200,
        ) {
            prop_assert!(!segment_intersects_rect(
                IVec2::new(ax, ay),
                IVec2::new(bx, by),
                &rect()
            ));
        }
    }
}
