//! Geometric primitives shared by the free-space index, packer, and
//! obstruction analyzer (spec §4.1).
//!
//! Axis mapping is fixed: an item's first oriented extent maps to W, the
//! second to H, the third to D. Fit and containment tests use a tolerance
//! scaled to the container (see [`crate::types::axis_epsilon`]); overlap
//! tests are always strict (`<`/`>`), matching the non-overlap invariant.

use crate::model::Placement;
use crate::types::Vec3;

/// One of the (up to) six axis-aligned orientations of an item's
/// `(w, d, h)` dimensions. `index` is the orientation's position in the
/// fixed enumeration order and is used as an explicit tie-break (§4.3 step
/// 3, §4.1 "lexicographic rotation index").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub index: usize,
    pub extents: Vec3,
}

/// Enumerates the six axis permutations of `dims`, mapping each permuted
/// triple directly onto (W, H, D). Permutations that produce identical
/// extents (because two or more of the item's dimensions are equal) are
/// deduplicated, keeping the lowest index — so a cube yields exactly one
/// candidate orientation.
pub fn rotations(dims: (f64, f64, f64)) -> Vec<Rotation> {
    let (a, b, c) = dims;
    let permutations = [
        (a, b, c),
        (a, c, b),
        (b, a, c),
        (b, c, a),
        (c, a, b),
        (c, b, a),
    ];

    let mut out: Vec<Rotation> = Vec::with_capacity(6);
    'outer: for (index, (w, h, d)) in permutations.into_iter().enumerate() {
        let extents = Vec3::new(w, d, h);
        for seen in &out {
            if seen.extents == extents {
                continue 'outer;
            }
        }
        out.push(Rotation { index, extents });
    }
    out
}

/// Checks whether a free cuboid of extents `free` can hold an oriented
/// item box of extents `item` (spec §4.1: `F.w ≥ a ∧ F.h ≥ b ∧ F.d ≥ c`).
#[inline]
pub fn fits(free: &Vec3, item: &Vec3, tolerance: f64) -> bool {
    free.w + tolerance >= item.w && free.h + tolerance >= item.h && free.d + tolerance >= item.d
}

/// Strict interior-overlap test between two committed placements (spec §3
/// non-overlap invariant). Delegates to [`crate::types::BoundingBox`].
#[inline]
pub fn intersects(a: &Placement, b: &Placement) -> bool {
    a.bounding_box().intersects(&b.bounding_box())
}

/// Overlap of two intervals on one axis; zero if disjoint or merely
/// touching.
#[inline]
pub fn overlap_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    (a2.min(b2) - a1.max(b1)).max(0.0)
}

/// Checks whether `inner`'s box is fully within `outer`'s extents, within
/// `tolerance` (spec §3 containment invariant).
#[inline]
pub fn contained_within(inner: &Placement, outer_extents: &Vec3, tolerance: f64) -> bool {
    inner.start.w >= -tolerance
        && inner.start.d >= -tolerance
        && inner.start.h >= -tolerance
        && inner.end.w <= outer_extents.w + tolerance
        && inner.end.d <= outer_extents.d + tolerance
        && inner.end.h <= outer_extents.h + tolerance
}

/// Tests item `x` obstructs item `t` per spec §4.5: `x` is shallower
/// (`x.d0 < t.d0`) and its (W, H) projection overlaps `t`'s.
pub fn obstructs(x: &Placement, t: &Placement) -> bool {
    if !(x.start.d < t.start.d) {
        return false;
    }
    x.start.w < t.end.w && x.end.w > t.start.w && x.start.h < t.end.h && x.end.h > t.start.h
}
