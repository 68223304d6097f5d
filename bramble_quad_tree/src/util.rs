// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Whether two AABBs overlap in any way.
///
/// The edge of a box is considered part of the box, so two boxes that merely
/// share an edge (or a corner) overlap. This is the intersection predicate the
/// whole index is built on: an object is stored in every quadrant its AABB
/// overlaps under this test.
///
/// # Examples
///
/// ```
/// use bramble_quad_tree::aabb_overlaps;
/// use kurbo::Rect;
///
/// assert!(aabb_overlaps(
///     Rect::new(0.0, 0.0, 10.0, 10.0),
///     Rect::new(5.0, 5.0, 15.0, 15.0),
/// ));
/// // Shared edges count.
/// assert!(aabb_overlaps(
///     Rect::new(0.0, 0.0, 10.0, 10.0),
///     Rect::new(10.0, 0.0, 20.0, 10.0),
/// ));
/// assert!(!aabb_overlaps(
///     Rect::new(0.0, 0.0, 10.0, 10.0),
///     Rect::new(11.0, 0.0, 20.0, 10.0),
/// ));
/// ```
#[inline]
pub fn aabb_overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

/// The shorter of the rectangle's two sides.
#[inline]
pub(crate) fn min_side(r: Rect) -> f64 {
    r.width().min(r.height())
}

/// The four equal quadrants of a rectangle, split at its midpoint.
///
/// Order: top-left, top-right, bottom-left, bottom-right (y-down convention,
/// matching `kurbo::Rect`).
#[inline]
pub(crate) fn child_quadrants(r: Rect) -> [Rect; 4] {
    let c = r.center();
    [
        Rect::new(r.x0, r.y0, c.x, c.y),
        Rect::new(c.x, r.y0, r.x1, c.y),
        Rect::new(r.x0, c.y, c.x, r.y1),
        Rect::new(c.x, c.y, r.x1, r.y1),
    ]
}
