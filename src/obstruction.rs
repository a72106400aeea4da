//! Obstruction analyzer: given a target item in a container, returns the
//! ordered list of items that must be removed and reinserted to free the
//! target through the open (D=0) face (spec §4.5).
//!
//! Read-only over current occupancy; never mutates the waste flag or any
//! placement.

use crate::geometry;
use crate::model::Placement;

/// One item blocking the target's retrieval path.
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievalStep {
    pub item_id: String,
    pub placement: Placement,
}

/// An occupant of the same container as the retrieval target, with its id.
pub struct Occupant<'a> {
    pub item_id: &'a str,
    pub placement: &'a Placement,
}

/// Precise form (spec §4.5 "Definition"): `X` obstructs `T` iff `X` is
/// shallower than `T` and their (W, H) projections overlap. Ordered by
/// ascending `d0`, ties by ascending `h0` then ascending `w0`.
pub fn find_obstructions(target: &Placement, occupants: &[Occupant]) -> Vec<RetrievalStep> {
    let mut blocking: Vec<&Occupant> = occupants
        .iter()
        .filter(|occupant| geometry::obstructs(occupant.placement, target))
        .collect();
    sort_by_depth_then_height_then_width(&mut blocking);
    blocking
        .into_iter()
        .map(|occupant| RetrievalStep {
            item_id: occupant.item_id.to_string(),
            placement: *occupant.placement,
        })
        .collect()
}

/// Degraded-data fallback (spec §4.5 "Simpler fallback form"): every item
/// shallower than the target is reported as blocking, without checking
/// (W, H) overlap. Used only when projection data is unavailable.
pub fn find_obstructions_fallback(target: &Placement, occupants: &[Occupant]) -> Vec<RetrievalStep> {
    let mut blocking: Vec<&Occupant> = occupants
        .iter()
        .filter(|occupant| occupant.placement.start.1 < target.start.1)
        .collect();
    sort_by_depth_then_height_then_width(&mut blocking);
    blocking
        .into_iter()
        .map(|occupant| RetrievalStep {
            item_id: occupant.item_id.to_string(),
            placement: *occupant.placement,
        })
        .collect()
}

fn sort_by_depth_then_height_then_width(occupants: &mut [&Occupant]) {
    occupants.sort_by(|a, b| {
        a.placement
            .start
            .1
            .partial_cmp(&b.placement.start.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.placement
                    .start
                    .2
                    .partial_cmp(&b.placement.start.2)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| {
                a.placement
                    .start
                    .0
                    .partial_cmp(&b.placement.start.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    fn placement_at(w0: f64, d0: f64, h0: f64, extents: (f64, f64, f64)) -> Placement {
        Placement::from_start_and_extents(Vec3::new(w0, d0, h0), Vec3::from_tuple(extents))
    }

    #[test]
    fn test_obstruction_order_closest_to_face_first() {
        let a = placement_at(0.0, 0.0, 0.0, (100.0, 50.0, 100.0));
        let b = placement_at(0.0, 50.0, 0.0, (100.0, 50.0, 100.0));
        let t = placement_at(0.0, 100.0, 0.0, (100.0, 50.0, 100.0));

        let occupants = vec![
            Occupant { item_id: "A", placement: &a },
            Occupant { item_id: "B", placement: &b },
        ];

        let steps = find_obstructions(&t, &occupants);
        let ids: Vec<&str> = steps.iter().map(|s| s.item_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_non_overlapping_shallower_item_does_not_obstruct() {
        let x = placement_at(200.0, 0.0, 0.0, (10.0, 10.0, 10.0));
        let t = placement_at(0.0, 50.0, 0.0, (10.0, 10.0, 10.0));
        let occupants = vec![Occupant { item_id: "X", placement: &x }];
        assert!(find_obstructions(&t, &occupants).is_empty());
    }

    #[test]
    fn test_deeper_item_does_not_obstruct() {
        let x = placement_at(0.0, 100.0, 0.0, (10.0, 10.0, 10.0));
        let t = placement_at(0.0, 50.0, 0.0, (10.0, 10.0, 10.0));
        let occupants = vec![Occupant { item_id: "X", placement: &x }];
        assert!(find_obstructions(&t, &occupants).is_empty());
    }

    #[test]
    fn test_fallback_ignores_wh_overlap() {
        let x = placement_at(200.0, 0.0, 0.0, (10.0, 10.0, 10.0));
        let t = placement_at(0.0, 50.0, 0.0, (10.0, 10.0, 10.0));
        let occupants = vec![Occupant { item_id: "X", placement: &x }];
        assert_eq!(find_obstructions_fallback(&t, &occupants).len(), 1);
    }
}
