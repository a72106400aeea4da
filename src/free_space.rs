//! Free-space index: the set of candidate free cuboids inside one
//! container (spec §4.2).
//!
//! The set is an over-approximation — inserting an occupying box only
//! guillotine-splits the cuboid it was drawn from, not every other
//! overlapping free cuboid. The packer compensates by validating
//! non-overlap against committed boxes before it commits a placement.

use crate::types::{BoundingBox, Vec3};

/// One candidate free cuboid: an origin corner and extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreeCuboid {
    pub origin: Vec3,
    pub extents: Vec3,
}

impl FreeCuboid {
    pub fn new(origin: Vec3, extents: Vec3) -> Self {
        Self { origin, extents }
    }

    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_position_and_dims(self.origin, self.extents)
    }
}

/// Maintains the free-cuboid set for a single container.
#[derive(Clone, Debug)]
pub struct FreeSpaceIndex {
    cuboids: Vec<FreeCuboid>,
}

impl FreeSpaceIndex {
    /// Seeds the index with one cuboid spanning the whole container.
    pub fn new(container_extents: Vec3) -> Self {
        Self {
            cuboids: vec![FreeCuboid::new(Vec3::zero(), container_extents)],
        }
    }

    pub fn candidates(&self) -> &[FreeCuboid] {
        &self.cuboids
    }

    /// Removes the chosen cuboid `F`, splits it into up to three residual
    /// cuboids around an item box of `extents` placed at `F`'s origin, and
    /// appends the non-degenerate residuals (spec §4.2 "Insert").
    pub fn insert(&mut self, chosen_index: usize, extents: Vec3) {
        let chosen = self.cuboids.swap_remove(chosen_index);
        let origin = chosen.origin;
        // (a, b, c) is the item's extent on (W, H, D), per the fixed axis
        // mapping (spec §4.1).
        let (a, b, c) = (extents.w, extents.h, extents.d);

        let residual_w = FreeCuboid::new(
            Vec3::new(origin.w + a, origin.d, origin.h),
            Vec3::new(chosen.extents.w - a, c, b),
        );
        let residual_h = FreeCuboid::new(
            Vec3::new(origin.w, origin.d, origin.h + b),
            Vec3::new(chosen.extents.w, c, chosen.extents.h - b),
        );
        let residual_d = FreeCuboid::new(
            Vec3::new(origin.w, origin.d + c, origin.h),
            Vec3::new(chosen.extents.w, chosen.extents.d - c, chosen.extents.h),
        );

        for residual in [residual_w, residual_h, residual_d] {
            if residual.extents.w > 0.0 && residual.extents.d > 0.0 && residual.extents.h > 0.0 {
                self.cuboids.push(residual);
            }
        }

        self.prune_contained(1e-9);
    }

    /// Splits every free cuboid overlapping `occupied` so that afterwards
    /// none of them intersect it. Used to seed the index from placements
    /// it did not cut itself (e.g. boxes already committed to a container
    /// when a packer resumes over it), where the occupied region need not
    /// sit flush against a cuboid's own origin the way [`Self::insert`]
    /// assumes.
    pub fn carve(&mut self, occupied: BoundingBox) {
        let mut next = Vec::with_capacity(self.cuboids.len());
        for cuboid in self.cuboids.drain(..) {
            let bbox = cuboid.bounding_box();
            if !bbox.intersects(&occupied) {
                next.push(cuboid);
                continue;
            }
            next.extend(Self::residuals(bbox, occupied));
        }
        self.cuboids = next;
        self.prune_contained(1e-9);
    }

    /// `cuboid` minus `occupied`, as up to six axis-aligned slabs (one per
    /// face of the clipped intersection that still has room). `occupied`
    /// is clipped to `cuboid` first so a box that only partially overlaps
    /// still carves a sensible remainder.
    fn residuals(cuboid: BoundingBox, occupied: BoundingBox) -> Vec<FreeCuboid> {
        let clip_min = Vec3::new(
            occupied.min.w.max(cuboid.min.w),
            occupied.min.d.max(cuboid.min.d),
            occupied.min.h.max(cuboid.min.h),
        );
        let clip_max = Vec3::new(
            occupied.max.w.min(cuboid.max.w),
            occupied.max.d.min(cuboid.max.d),
            occupied.max.h.min(cuboid.max.h),
        );

        let mut out = Vec::with_capacity(6);
        let mut push = |min: Vec3, max: Vec3| {
            let extents = max - min;
            if extents.w > 0.0 && extents.d > 0.0 && extents.h > 0.0 {
                out.push(FreeCuboid::new(min, extents));
            }
        };

        push(cuboid.min, Vec3::new(clip_min.w, cuboid.max.d, cuboid.max.h));
        push(Vec3::new(clip_max.w, cuboid.min.d, cuboid.min.h), cuboid.max);
        push(
            Vec3::new(clip_min.w, cuboid.min.d, cuboid.min.h),
            Vec3::new(clip_max.w, clip_min.d, cuboid.max.h),
        );
        push(
            Vec3::new(clip_min.w, clip_max.d, cuboid.min.h),
            Vec3::new(clip_max.w, cuboid.max.d, cuboid.max.h),
        );
        push(
            Vec3::new(clip_min.w, clip_min.d, cuboid.min.h),
            Vec3::new(clip_max.w, clip_max.d, clip_min.h),
        );
        push(
            Vec3::new(clip_min.w, clip_min.d, clip_max.h),
            Vec3::new(clip_max.w, clip_max.d, cuboid.max.h),
        );

        out
    }

    /// Monotone cleanup: drops any free cuboid fully contained in another
    /// (spec §4.2 step 3, optional). Never drops the last remaining cuboid.
    fn prune_contained(&mut self, tolerance: f64) {
        let n = self.cuboids.len();
        let mut keep = vec![true; n];
        for i in 0..n {
            if !keep[i] {
                continue;
            }
            for j in 0..n {
                if i == j || !keep[j] {
                    continue;
                }
                let bi = self.cuboids[i].bounding_box();
                let bj = self.cuboids[j].bounding_box();
                if bi != bj && bi.contained_in(&bj, tolerance) {
                    keep[i] = false;
                    break;
                }
            }
        }
        let mut kept = Vec::with_capacity(n);
        for (cuboid, keep) in self.cuboids.drain(..).zip(keep) {
            if keep {
                kept.push(cuboid);
            }
        }
        self.cuboids = kept;
    }
}
