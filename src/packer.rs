//! Per-container packer: chooses a free cuboid and rotation for an
//! incoming item by a priority-aware cost function, then commits the
//! placement (spec §4.3).

use crate::free_space::FreeSpaceIndex;
use crate::geometry::{self, rotations};
use crate::model::Placement;
use crate::types::{Vec3, axis_epsilon};

/// One scored placement candidate.
struct Candidate {
    free_index: usize,
    origin: Vec3,
    extents: Vec3,
    rotation_index: usize,
    score: f64,
}

/// Packs items into one container's free-space index, validating every
/// commit against the boxes already placed in it.
pub struct Packer {
    extents: Vec3,
    free_space: FreeSpaceIndex,
    committed: Vec<Placement>,
}

impl Packer {
    pub fn new(container_extents: Vec3) -> Self {
        Self {
            extents: container_extents,
            free_space: FreeSpaceIndex::new(container_extents),
            committed: Vec::new(),
        }
    }

    /// Rebuilds a packer from boxes already committed to this container
    /// (used when resuming a planning run against a loaded store). Each
    /// existing box carves the free-space index before any new candidate
    /// is enumerated, so later inserts see the real residual free space
    /// rather than the untouched full-container cuboid.
    pub fn with_existing(container_extents: Vec3, committed: Vec<Placement>) -> Self {
        let mut packer = Self::new(container_extents);
        for placement in &committed {
            packer.free_space.carve(placement.bounding_box());
        }
        packer.committed = committed;
        packer
    }

    pub fn committed(&self) -> &[Placement] {
        &self.committed
    }

    fn tolerance(&self) -> f64 {
        axis_epsilon(self.extents.w)
            .min(axis_epsilon(self.extents.d))
            .min(axis_epsilon(self.extents.h))
    }

    /// Attempts to place an item with dimensions `dims` and `priority`.
    /// Returns the committed placement, or `None` if no candidate fits
    /// (spec §4.3 step 4 "no fit").
    pub fn insert(&mut self, dims: (f64, f64, f64), priority: i32) -> Option<Placement> {
        let tolerance = self.tolerance();
        let orientations = rotations(dims);

        let mut candidates = self.enumerate_candidates(&orientations, priority, tolerance);
        candidates.sort_by(|a, b| self.tie_break(a, b));

        // Step 4: drop candidates that collide with an already-committed
        // box (possible because the free set over-approximates) and retry
        // the next best, in score order, until one commits or none remain.
        let candidate = candidates.into_iter().find(|candidate| {
            let placement = Placement::from_start_and_extents(candidate.origin, candidate.extents);
            !self.overlaps_committed(&placement)
        })?;

        self.free_space.insert(candidate.free_index, candidate.extents);
        let placement = Placement::from_start_and_extents(candidate.origin, candidate.extents);
        self.committed.push(placement);
        Some(placement)
    }

    fn enumerate_candidates(
        &self,
        orientations: &[geometry::Rotation],
        priority: i32,
        tolerance: f64,
    ) -> Vec<Candidate> {
        let mut out = Vec::new();
        for (free_index, free) in self.free_space.candidates().iter().enumerate() {
            for rotation in orientations {
                if !geometry::fits(&free.extents, &rotation.extents, tolerance) {
                    continue;
                }
                let score = Self::score(free.origin, priority);
                out.push(Candidate {
                    free_index,
                    origin: free.origin,
                    extents: rotation.extents,
                    rotation_index: rotation.index,
                    score,
                });
            }
        }
        out
    }

    /// `score(F) = 0.5*F.d + 0.3*F.w + 0.2*F.h - 0.1*priority` (spec §4.3
    /// step 2): depth from the open face dominates, with a small priority
    /// bonus letting high-priority items win a shallower shelf.
    fn score(origin: Vec3, priority: i32) -> f64 {
        0.5 * origin.d + 0.3 * origin.w + 0.2 * origin.h - 0.1 * priority as f64
    }

    /// Ties broken by ascending depth, then height, then width, then
    /// rotation index (spec §4.3 step 3).
    fn tie_break(&self, a: &Candidate, b: &Candidate) -> std::cmp::Ordering {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.origin.d.partial_cmp(&b.origin.d).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.origin.h.partial_cmp(&b.origin.h).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.origin.w.partial_cmp(&b.origin.w).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.rotation_index.cmp(&b.rotation_index))
    }

    fn overlaps_committed(&self, placement: &Placement) -> bool {
        self.committed.iter().any(|existing| geometry::intersects(existing, placement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_perfect_fit() {
        let mut packer = Packer::new(Vec3::new(100.0, 100.0, 100.0));
        let placement = packer.insert((50.0, 50.0, 50.0), 50).unwrap();
        assert_eq!(placement.start, (0.0, 0.0, 0.0));
        assert_eq!(placement.end, (50.0, 50.0, 50.0));
    }

    #[test]
    fn test_rotation_required() {
        // Container 60 x 10 (D) x 200, item 10 x 60 x 200 must rotate.
        let mut packer = Packer::new(Vec3::new(60.0, 10.0, 200.0));
        let placement = packer.insert((10.0, 60.0, 200.0), 50).unwrap();
        let extents = placement.extents();
        let mut sides = [extents.w, extents.d, extents.h];
        sides.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(sides, [10.0, 60.0, 200.0]);
    }

    #[test]
    fn test_priority_wins_depth() {
        let mut packer = Packer::new(Vec3::new(100.0, 100.0, 100.0));
        let low = packer.insert((40.0, 40.0, 40.0), 10).unwrap();
        let high = packer.insert((40.0, 40.0, 40.0), 90).unwrap();
        assert!(high.start.1 <= low.start.1);
    }

    #[test]
    fn test_no_fit_returns_none() {
        let mut packer = Packer::new(Vec3::new(10.0, 10.0, 10.0));
        assert!(packer.insert((20.0, 20.0, 20.0), 50).is_none());
    }

    #[test]
    fn test_second_item_does_not_overlap_first() {
        let mut packer = Packer::new(Vec3::new(100.0, 100.0, 100.0));
        let a = packer.insert((50.0, 50.0, 50.0), 50).unwrap();
        let b = packer.insert((50.0, 50.0, 50.0), 50).unwrap();
        assert!(!geometry::intersects(&a, &b));
    }

    #[test]
    fn test_with_existing_still_fits_new_item_around_prior_commit() {
        // Container 100x100x100 already holds a 50x50x50 box at the
        // origin (the corner every first placement lands on); a later
        // planning run resuming over it must still find room elsewhere.
        let mut packer = Packer::new(Vec3::new(100.0, 100.0, 100.0));
        let a = packer.insert((50.0, 50.0, 50.0), 50).unwrap();

        let mut resumed = Packer::with_existing(Vec3::new(100.0, 100.0, 100.0), vec![a]);
        let b = resumed.insert((10.0, 10.0, 10.0), 50);
        assert!(b.is_some());
        assert!(!geometry::intersects(&a, &b.unwrap()));
    }
}
